//! Deterministic leader selection.
//!
//! Every node computes the same leader from the same membership view, with
//! no election protocol or leader-to-leader coordination: the leader is
//! simply the lowest-ranked live member, by the same `(address, uid)`
//! ordering gossip uses to merge state.

// Layer 3: Internal module imports
use crate::cluster::member::{Member, MemberStatus};
use crate::util::NodeAddress;

/// Members eligible to hold leadership: anything live and not already on
/// its way out of the cluster.
fn is_leadership_eligible(status: MemberStatus) -> bool {
    matches!(
        status,
        MemberStatus::Up | MemberStatus::Leaving | MemberStatus::WeaklyUp
    )
}

/// Compute the current leader from a membership snapshot. Returns `None`
/// if no member is eligible (e.g. every member is still `Joining`).
pub fn compute_leader(members: &[Member]) -> Option<NodeAddress> {
    members
        .iter()
        .filter(|m| is_leadership_eligible(m.status))
        .min_by_key(|m| m.leadership_rank())
        .map(|m| m.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    fn member(port: u16, status: MemberStatus) -> Member {
        let address = NodeAddress::new(
            "test",
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port),
            1,
        );
        let mut m = Member::new(address, vec![]);
        m.status = status;
        m
    }

    #[test]
    fn lowest_address_among_up_members_wins() {
        let members = vec![
            member(2553, MemberStatus::Up),
            member(2551, MemberStatus::Up),
            member(2552, MemberStatus::Up),
        ];
        assert_eq!(compute_leader(&members).unwrap().socket.port(), 2551);
    }

    #[test]
    fn joining_members_are_not_eligible() {
        let members = vec![member(2551, MemberStatus::Joining)];
        assert!(compute_leader(&members).is_none());
    }

    #[test]
    fn down_members_are_skipped_in_favor_of_up_ones() {
        let members = vec![
            member(2550, MemberStatus::Down),
            member(2551, MemberStatus::Up),
        ];
        assert_eq!(compute_leader(&members).unwrap().socket.port(), 2551);
    }
}
