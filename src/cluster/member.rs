//! Cluster member identity and the membership state machine.

// Layer 1: Standard library imports
use std::cmp::Ordering;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::util::NodeAddress;

/// A member's position in the membership lifecycle.
///
/// Transitions are monotonic and one-directional: `Joining -> WeaklyUp ->
/// Up -> Leaving -> Exiting -> Removed`, with `Down` reachable from any
/// state once the failure detector or an operator marks a member
/// unreachable-and-confirmed-dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    Joining,
    WeaklyUp,
    Up,
    Leaving,
    Exiting,
    Down,
    Removed,
}

impl MemberStatus {
    /// `true` if gossip should still propagate state about this member.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Removed)
    }

    /// Valid next states from this one (ignoring `Down`, reachable from any
    /// state via the failure detector rather than a voluntary transition).
    pub fn allowed_transitions(&self) -> &'static [MemberStatus] {
        use MemberStatus::*;
        match self {
            Joining => &[WeaklyUp, Up, Down],
            WeaklyUp => &[Up, Down],
            Up => &[Leaving, Down],
            Leaving => &[Exiting, Down],
            Exiting => &[Removed, Down],
            Down => &[Removed],
            Removed => &[],
        }
    }

    pub fn can_transition_to(&self, next: MemberStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

/// One cluster member as known to the local gossip state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub address: NodeAddress,
    pub status: MemberStatus,
    /// Monotonic per-member version; gossip merges keep the higher one.
    pub version: u64,
    pub roles: Vec<String>,
}

impl Member {
    pub fn new(address: NodeAddress, roles: Vec<String>) -> Self {
        Self {
            address,
            status: MemberStatus::Joining,
            version: 0,
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Apply a status transition, bumping the version. Returns `false`
    /// (no-op) if the transition is not allowed from the current status.
    pub fn transition(&mut self, next: MemberStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.version += 1;
        true
    }

    /// Ordering used to pick a deterministic leader: lower `(address, uid)`
    /// wins, matching `NodeAddress`'s own `Ord`.
    pub fn leadership_rank(&self) -> NodeAddress {
        self.address
    }
}

impl PartialOrd for Member {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Member {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address.cmp(&other.address)
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
    fn valid_transitions_bump_version() {
        let mut m = Member::new(addr(2551), vec![]);
        assert!(m.transition(MemberStatus::Up));
        assert_eq!(m.version, 1);
        assert_eq!(m.status, MemberStatus::Up);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut m = Member::new(addr(2551), vec![]);
        assert!(!m.transition(MemberStatus::Exiting));
        assert_eq!(m.version, 0);
    }

    #[test]
    fn removed_is_terminal() {
        let status = MemberStatus::Removed;
        assert!(status.allowed_transitions().is_empty());
    }

    #[test]
    fn down_is_reachable_from_any_live_state() {
        for status in [
            MemberStatus::Joining,
            MemberStatus::WeaklyUp,
            MemberStatus::Up,
            MemberStatus::Leaving,
            MemberStatus::Exiting,
        ] {
            assert!(status.can_transition_to(MemberStatus::Down));
        }
    }
}
