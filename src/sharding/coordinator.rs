//! The shard coordinator: decides which node hosts each shard and drives
//! rebalancing as members join and leave. Runs as a cluster singleton —
//! exactly one instance per sharded entity type, cluster-wide.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

// Layer 3: Internal module imports
use crate::util::NodeAddress;

#[derive(Debug, Error)]
pub enum ShardingError {
    #[error("shard {shard_id} has no allocated host")]
    UnallocatedShard { shard_id: String },

    #[error("cannot rebalance: no cluster members available to host shards")]
    NoAvailableMembers,
}

/// Tracks shard-to-node allocation for one entity type and computes
/// rebalancing moves as membership changes. The actual entity lifecycle
/// (start/stop, message delivery) lives in [`super::region::ShardRegion`];
/// this type only owns the allocation decision.
pub struct ShardCoordinator {
    allocations: RwLock<HashMap<String, NodeAddress>>,
}

impl Default for ShardCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardCoordinator {
    pub fn new() -> Self {
        Self {
            allocations: RwLock::new(HashMap::new()),
        }
    }

    pub fn host_of(&self, shard_id: &str) -> Option<NodeAddress> {
        self.allocations.read().get(shard_id).copied()
    }

    /// Allocate `shard_id` to the least-loaded of `candidates`, returning
    /// the chosen host. Idempotent: a shard already allocated to a live
    /// candidate keeps its current host rather than being reshuffled.
    pub fn allocate(
        &self,
        shard_id: &str,
        candidates: &[NodeAddress],
    ) -> Result<NodeAddress, ShardingError> {
        if candidates.is_empty() {
            return Err(ShardingError::NoAvailableMembers);
        }
        let mut allocations = self.allocations.write();
        if let Some(existing) = allocations.get(shard_id) {
            if candidates.contains(existing) {
                return Ok(*existing);
            }
        }
        let mut load: HashMap<NodeAddress, usize> =
            candidates.iter().map(|c| (*c, 0)).collect();
        for host in allocations.values() {
            if let Some(count) = load.get_mut(host) {
                *count += 1;
            }
        }
        let chosen = *load
            .iter()
            .min_by_key(|(_, count)| **count)
            .map(|(node, _)| node)
            .expect("candidates is non-empty");
        allocations.insert(shard_id.to_string(), chosen);
        info!(shard_id, host = %chosen, "shard allocated");
        Ok(chosen)
    }

    /// Drop all allocations pointing at `departed`, returning the shard
    /// ids that now need reallocation.
    pub fn handle_member_removed(&self, departed: &NodeAddress) -> Vec<String> {
        let mut allocations = self.allocations.write();
        let orphaned: Vec<String> = allocations
            .iter()
            .filter(|(_, host)| *host == departed)
            .map(|(shard_id, _)| shard_id.clone())
            .collect();
        for shard_id in &orphaned {
            allocations.remove(shard_id);
        }
        orphaned
    }

    /// Shards currently allocated to the heaviest-loaded member, up to
    /// `max_moves`, so the caller can trigger a handoff — rebalancing
    /// moves one shard at a time rather than draining a member all at
    /// once, avoiding a thundering herd of entity restarts.
    pub fn rebalance_candidates(&self, max_moves: usize) -> Vec<String> {
        let allocations = self.allocations.read();
        let mut load: HashMap<NodeAddress, Vec<String>> = HashMap::new();
        for (shard_id, host) in allocations.iter() {
            load.entry(*host).or_default().push(shard_id.clone());
        }
        let Some((_, busiest_shards)) = load.iter().max_by_key(|(_, shards)| shards.len()) else {
            return Vec::new();
        };
        let mut candidates = busiest_shards.clone();
        candidates.sort();
        candidates.truncate(max_moves);
        candidates
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
    fn allocate_picks_least_loaded_candidate() {
        let coordinator = ShardCoordinator::new();
        let candidates = vec![addr(1), addr(2)];
        coordinator.allocate("0", &candidates).unwrap();
        coordinator.allocate("1", &candidates).unwrap();
        let third = coordinator.allocate("2", &candidates).unwrap();
        // both candidates now have one shard; third goes to whichever the
        // tie-break (iteration order) picks, but must be one of them.
        assert!(candidates.contains(&third));
    }

    #[test]
    fn reallocating_an_existing_shard_is_stable() {
        let coordinator = ShardCoordinator::new();
        let candidates = vec![addr(1), addr(2)];
        let first = coordinator.allocate("0", &candidates).unwrap();
        let second = coordinator.allocate("0", &candidates).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn member_removal_orphans_its_shards() {
        let coordinator = ShardCoordinator::new();
        let candidates = vec![addr(1)];
        coordinator.allocate("0", &candidates).unwrap();
        let orphaned = coordinator.handle_member_removed(&addr(1));
        assert_eq!(orphaned, vec!["0".to_string()]);
        assert!(coordinator.host_of("0").is_none());
    }

    #[test]
    fn allocate_with_no_candidates_errs() {
        let coordinator = ShardCoordinator::new();
        assert!(coordinator.allocate("0", &[]).is_err());
    }
}
