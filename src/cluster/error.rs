// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::transport::TransportError;
use crate::util::NodeAddress;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("{member} is not a member of this cluster")]
    UnknownMember { member: NodeAddress },

    #[error("cannot join: seed nodes {seeds:?} are all unreachable")]
    SeedNodesUnreachable { seeds: Vec<NodeAddress> },

    #[error("this node was downed and removed from the cluster")]
    SelfDowned,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ClusterError {
    /// Once a node is downed it must restart the process to rejoin — no
    /// retry within the same runtime can recover from this.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SelfDowned)
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::SeedNodesUnreachable { .. } => true,
            _ => false,
        }
    }
}
