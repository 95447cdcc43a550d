//! Comprehensive broker error types with context.
//!
//! This module defines all error types that can occur during message broker operations,
//! including routing failures, timeout errors, and registry management errors.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::ActorAddress;

/// Comprehensive broker error types with contextual information.
///
/// BrokerError represents all possible failure modes in the message broker system,
/// from actor registration failures to message delivery timeouts.
///
/// # Design Principles
///
/// - **Contextual**: Each error variant includes relevant context for debugging
/// - **Structured**: Uses thiserror for automatic Error trait implementation
/// - **Type-Safe**: Strongly typed error variants with no string-only errors
///
/// # Example
///
/// ```rust
/// use airssys_cluster::broker::BrokerError;
/// use airssys_cluster::util::ActorAddress;
/// use std::time::Duration;
///
/// let error = BrokerError::ActorNotFound(ActorAddress::anonymous());
/// assert!(error.to_string().contains("Actor not found"));
///
/// let timeout_error = BrokerError::SendTimeout {
///     target: ActorAddress::anonymous(),
///     timeout: Duration::from_secs(5),
/// };
/// assert!(timeout_error.to_string().contains("Send timeout"));
/// ```
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Actor not found in registry
    ///
    /// This error occurs when attempting to send a message to an actor address
    /// that is not currently registered in the broker's routing table.
    #[error("Actor not found: {0:?}")]
    ActorNotFound(ActorAddress),

    /// Actor mailbox is closed (actor stopped)
    ///
    /// This error occurs when the target actor has stopped and its mailbox
    /// is no longer accepting messages. The mailbox sender has been dropped.
    #[error("Mailbox closed for actor: {0:?}")]
    MailboxClosed(ActorAddress),

    /// Send operation timed out
    ///
    /// This error occurs when a send operation exceeds the configured timeout
    /// duration, typically due to backpressure or mailbox full conditions.
    #[error("Send timeout: target={target:?}, timeout={timeout:?}")]
    SendTimeout {
        /// The target actor address that was unreachable
        target: ActorAddress,
        /// The timeout duration that was exceeded
        timeout: Duration,
    },

    /// Request-reply operation timed out
    ///
    /// This error occurs when a request-reply operation does not receive a
    /// response within the configured timeout duration.
    #[error("Request timeout: target={target:?}, timeout={timeout:?}")]
    RequestTimeout {
        /// The target actor address that did not respond
        target: ActorAddress,
        /// The timeout duration that was exceeded
        timeout: Duration,
    },

    /// Registry operation failed
    ///
    /// This error occurs during actor registration, unregistration, or
    /// address resolution operations in the actor registry.
    #[error("Registry error: {0}")]
    RegistryError(String),

    /// Message routing failed
    ///
    /// This error occurs when the broker cannot route a message due to
    /// configuration issues, invalid addresses, or routing logic failures.
    #[error("Route error: message_type={message_type}, reason={reason}")]
    RouteError {
        /// The type of message that failed to route
        message_type: &'static str,
        /// The reason for the routing failure
        reason: String,
    },

    /// Broker not initialized in actor context
    ///
    /// This error occurs when attempting to use broker functionality from
    /// an ActorContext that has not been properly initialized with a broker.
    #[error("Broker not initialized in actor context")]
    BrokerNotInitialized,

    /// No response received for request
    ///
    /// This error occurs when a request-reply operation completes without
    /// a response, distinct from timeout (the operation completed but no
    /// response was provided).
    #[error("No response received for request")]
    NoResponse,

    /// Actor pool not found
    ///
    /// This error occurs when attempting to route a message to a named actor
    /// pool that does not exist in the registry.
    #[error("Actor pool not found: {0}")]
    PoolNotFound(String),

    /// Actor pool is empty
    ///
    /// This error occurs when attempting to route a message to an actor pool
    /// that exists but has no registered actors.
    #[error("Actor pool is empty: {0}")]
    PoolEmpty(String),

    /// Duplicate actor registration
    ///
    /// This error occurs when attempting to register an actor with an address
    /// that is already registered in the routing table.
    #[error("Duplicate actor registration: {0:?}")]
    DuplicateRegistration(ActorAddress),
}
