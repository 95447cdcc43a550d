//! Split-brain resolver strategies.
//!
//! Each strategy is a pure function from a [`ClusterSnapshot`] plus the set
//! of members currently unreachable (per the failure detector) to the set
//! of members to down. Keeping these as pure functions over a snapshot
//! (rather than methods with side effects) makes each strategy trivially
//! unit-testable without spinning up gossip or a failure detector.

// Layer 1: Standard library imports
use std::collections::HashSet;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::cluster::gossip::ClusterSnapshot;
use crate::util::NodeAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitBrainStrategy {
    StaticQuorum { size: usize },
    KeepMajority,
    KeepOldest,
    KeepReferee { referee: NodeAddress, down_all_if_less_than: usize },
    DownAll,
}

/// Decide which members to down, given the live set and the subset of it
/// currently reported unreachable. `live` and `unreachable` are both
/// drawn from the same snapshot; `unreachable` is always a subset of `live`.
pub fn resolve(
    strategy: &SplitBrainStrategy,
    live: &[NodeAddress],
    unreachable: &HashSet<NodeAddress>,
) -> Vec<NodeAddress> {
    if unreachable.is_empty() {
        return Vec::new();
    }
    match strategy {
        SplitBrainStrategy::DownAll => live.to_vec(),
        SplitBrainStrategy::StaticQuorum { size } => {
            let reachable_count = live.len() - unreachable.len();
            if reachable_count >= *size {
                unreachable.iter().copied().collect()
            } else {
                live.to_vec()
            }
        }
        SplitBrainStrategy::KeepMajority => {
            let reachable_count = live.len() - unreachable.len();
            if reachable_count * 2 > live.len() {
                unreachable.iter().copied().collect()
            } else if reachable_count * 2 < live.len() {
                live.iter()
                    .filter(|m| !unreachable.contains(m))
                    .copied()
                    .collect()
            } else {
                // Exact tie: side containing the lowest-ranked member wins,
                // matching the deterministic leader ordering.
                let lowest = live.iter().min().copied();
                match lowest {
                    Some(lowest) if unreachable.contains(&lowest) => {
                        live.iter().filter(|m| !unreachable.contains(m)).copied().collect()
                    }
                    _ => unreachable.iter().copied().collect(),
                }
            }
        }
        SplitBrainStrategy::KeepOldest => {
            // "Oldest" == lowest-ranked by the same ordering used for
            // leadership, since no separate join-order counter is tracked.
            let oldest = live.iter().min().copied();
            match oldest {
                Some(oldest) if unreachable.contains(&oldest) => {
                    live.iter().filter(|m| m != &&oldest).copied().collect()
                }
                _ => unreachable.iter().copied().collect(),
            }
        }
        SplitBrainStrategy::KeepReferee {
            referee,
            down_all_if_less_than,
        } => {
            if unreachable.contains(referee) {
                return live.to_vec();
            }
            let reachable_count = live.len() - unreachable.len();
            if reachable_count < *down_all_if_less_than {
                live.to_vec()
            } else {
                unreachable.iter().copied().collect()
            }
        }
    }
}

/// Convenience wrapper pulling the live set straight from a snapshot.
pub fn resolve_from_snapshot(
    strategy: &SplitBrainStrategy,
    snapshot: &ClusterSnapshot,
    unreachable: &HashSet<NodeAddress>,
) -> Vec<NodeAddress> {
    let live: Vec<NodeAddress> = snapshot.live_members().into_iter().map(|m| m.address).collect();
    resolve(strategy, &live, unreachable)
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
    fn static_quorum_downs_unreachable_when_quorum_met() {
        let live = vec![addr(1), addr(2), addr(3), addr(4), addr(5)];
        let unreachable: HashSet<_> = [addr(4), addr(5)].into_iter().collect();
        let downed = resolve(&SplitBrainStrategy::StaticQuorum { size: 3 }, &live, &unreachable);
        assert_eq!(downed.len(), 2);
        assert!(downed.contains(&addr(4)));
    }

    #[test]
    fn static_quorum_downs_everyone_when_quorum_lost() {
        let live = vec![addr(1), addr(2), addr(3), addr(4), addr(5)];
        let unreachable: HashSet<_> = [addr(2), addr(3), addr(4), addr(5)].into_iter().collect();
        let downed = resolve(&SplitBrainStrategy::StaticQuorum { size: 3 }, &live, &unreachable);
        assert_eq!(downed.len(), 5);
    }

    #[test]
    fn keep_majority_downs_minority_side() {
        let live = vec![addr(1), addr(2), addr(3)];
        let unreachable: HashSet<_> = [addr(3)].into_iter().collect();
        let downed = resolve(&SplitBrainStrategy::KeepMajority, &live, &unreachable);
        assert_eq!(downed, vec![addr(3)]);
    }

    #[test]
    fn keep_oldest_survives_its_own_partition() {
        let live = vec![addr(1), addr(2), addr(3)];
        let unreachable: HashSet<_> = [addr(2), addr(3)].into_iter().collect();
        let downed = resolve(&SplitBrainStrategy::KeepOldest, &live, &unreachable);
        assert_eq!(downed.into_iter().collect::<HashSet<_>>(), unreachable);
    }

    #[test]
    fn keep_referee_downs_all_when_referee_unreachable() {
        let live = vec![addr(1), addr(2), addr(3)];
        let unreachable: HashSet<_> = [addr(1)].into_iter().collect();
        let downed = resolve(
            &SplitBrainStrategy::KeepReferee { referee: addr(1), down_all_if_less_than: 2 },
            &live,
            &unreachable,
        );
        assert_eq!(downed.len(), 3);
    }

    #[test]
    fn no_unreachable_members_means_no_action() {
        let live = vec![addr(1), addr(2)];
        let downed = resolve(&SplitBrainStrategy::KeepMajority, &live, &HashSet::new());
        assert!(downed.is_empty());
    }
}
