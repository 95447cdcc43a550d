//! Cluster membership: gossip-based convergence, phi-accrual failure
//! detection, deterministic leader election and split-brain resolution.

pub mod error;
pub mod events;
pub mod failure_detector;
pub mod gossip;
pub mod leader;
pub mod member;
pub mod sbr;

pub use error::ClusterError;
pub use events::{ClusterEvent, HeartbeatHistory};
pub use failure_detector::{FailureDetectorConfig, PhiAccrualFailureDetector};
pub use gossip::ClusterSnapshot;
pub use leader::compute_leader;
pub use member::{Member, MemberStatus};
pub use sbr::{resolve_from_snapshot, SplitBrainStrategy};

// Layer 1: Standard library imports
use std::collections::HashSet;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

// Layer 3: Internal module imports
use crate::util::NodeAddress;

/// The local node's view of the cluster: membership snapshot, failure
/// detector and the configured split-brain strategy, wired together.
///
/// `ClusterState` holds no network code of its own; `system::cluster_system`
/// drives gossip rounds and heartbeats over `transport` and feeds their
/// results back in through [`ClusterState::heartbeat`] and
/// [`ClusterState::merge_snapshot`].
pub struct ClusterState {
    self_address: NodeAddress,
    snapshot: RwLock<ClusterSnapshot>,
    failure_detector: Arc<PhiAccrualFailureDetector>,
    sbr_strategy: SplitBrainStrategy,
}

impl ClusterState {
    pub fn new(
        self_address: NodeAddress,
        failure_detector_config: FailureDetectorConfig,
        sbr_strategy: SplitBrainStrategy,
    ) -> Self {
        let mut snapshot = ClusterSnapshot::new();
        snapshot.upsert(Member::new(self_address, vec![]));
        Self {
            self_address,
            snapshot: RwLock::new(snapshot),
            failure_detector: Arc::new(PhiAccrualFailureDetector::new(failure_detector_config)),
            sbr_strategy,
        }
    }

    pub fn self_address(&self) -> NodeAddress {
        self.self_address
    }

    pub fn snapshot(&self) -> ClusterSnapshot {
        self.snapshot.read().clone()
    }

    pub fn leader(&self) -> Option<NodeAddress> {
        let snapshot = self.snapshot.read();
        compute_leader(&snapshot.members().cloned().collect::<Vec<_>>())
    }

    pub fn merge_snapshot(&self, incoming: &ClusterSnapshot) {
        self.snapshot.write().merge(incoming);
    }

    pub fn heartbeat(&self, from: NodeAddress) {
        self.failure_detector.heartbeat(from, Utc::now());
    }

    /// Members the failure detector currently considers unreachable.
    pub fn unreachable_members(&self) -> HashSet<NodeAddress> {
        let snapshot = self.snapshot.read();
        let now = Utc::now();
        snapshot
            .live_members()
            .into_iter()
            .filter(|m| m.address != self.self_address)
            .filter(|m| !self.failure_detector.is_available(&m.address, now))
            .map(|m| m.address)
            .collect()
    }

    /// Run the split-brain resolver against the current view; returns the
    /// members it decided to down. Callers are responsible for actually
    /// transitioning those members and propagating the decision via gossip.
    pub fn resolve_split_brain(&self) -> Vec<NodeAddress> {
        let unreachable = self.unreachable_members();
        if unreachable.is_empty() {
            return Vec::new();
        }
        let snapshot = self.snapshot.read();
        let decision = resolve_from_snapshot(&self.sbr_strategy, &snapshot, &unreachable);
        if !decision.is_empty() {
            info!(?decision, "split-brain resolver downing members");
        }
        decision
    }

    pub fn down(&self, member: &NodeAddress) {
        self.snapshot.write().transition(member, MemberStatus::Down);
        self.failure_detector.remove(member);
    }

    /// Promote this node to `Up` in the local view. Real convergence still
    /// depends on gossip carrying the new version to peers; this only
    /// updates what this node believes about itself.
    pub fn promote_self_up(&self) -> bool {
        self.snapshot
            .write()
            .transition(&self.self_address, MemberStatus::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    fn addr(port: u16) -> NodeAddress {
        NodeAddress::new(
            "test",
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port),
            1,
        )
    }

    #[test]
    fn new_state_contains_only_self() {
        let state = ClusterState::new(
            addr(2551),
            FailureDetectorConfig::default(),
            SplitBrainStrategy::KeepMajority,
        );
        assert_eq!(state.snapshot().live_members().len(), 1);
        assert!(state.unreachable_members().is_empty());
    }

    #[test]
    fn merging_a_peer_snapshot_adds_members() {
        let state = ClusterState::new(
            addr(2551),
            FailureDetectorConfig::default(),
            SplitBrainStrategy::KeepMajority,
        );
        let mut peer_snapshot = ClusterSnapshot::new();
        peer_snapshot.upsert(Member::new(addr(2552), vec![]));
        state.merge_snapshot(&peer_snapshot);
        assert_eq!(state.snapshot().live_members().len(), 2);
    }
}
