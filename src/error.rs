//! Top-level error aggregation across the clustered runtime.
//!
//! Individual modules (`actor::ask`, `mailbox`, `supervisor`, `cluster`,
//! `sharding`, `singleton`, `transport`) each define their own focused
//! error enum; `AirssysClusterError` is the one type a `ClusterSystem`
//! caller needs to match against without reaching into every submodule.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::actor::AskError;
use crate::cluster::ClusterError;
use crate::mailbox::MailboxError;
use crate::sharding::ShardingError;
use crate::singleton::SingletonError;
use crate::supervisor::SupervisorError;
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum AirssysClusterError {
    #[error(transparent)]
    Mailbox(#[from] MailboxError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Sharding(#[from] ShardingError),

    #[error(transparent)]
    Singleton(#[from] SingletonError),

    #[error(transparent)]
    Ask(#[from] AskError),
}

impl AirssysClusterError {
    /// No retry within this process can recover; the caller must restart
    /// or rejoin rather than loop.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Cluster(e) => e.is_fatal(),
            _ => false,
        }
    }

    /// Worth retrying with backoff rather than surfacing immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Cluster(e) => e.is_retryable(),
            Self::Ask(AskError::Timeout { .. }) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ActorAddress;

    #[test]
    fn ask_timeout_is_retryable() {
        let err: AirssysClusterError = AskError::Timeout {
            target: ActorAddress::anonymous(),
            elapsed_ms: 500,
        }
        .into();
        assert!(err.is_retryable());
        assert!(!err.is_fatal());
    }

    #[test]
    fn self_downed_is_fatal() {
        let err: AirssysClusterError = ClusterError::SelfDowned.into();
        assert!(err.is_fatal());
    }
}
