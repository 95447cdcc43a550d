// Layer 1: Standard library imports
use std::fmt::Debug;

// Layer 2: Third-party crate imports
// (none for this module)

// Layer 3: Internal module imports
// (none yet)

/// Core message trait with compile-time type identification
/// 
/// # Zero-Cost Abstraction
/// Uses const MESSAGE_TYPE instead of runtime reflection for maximum performance.
/// All message types are resolved at compile time.
///
/// # Design Principles
/// - **Type Safety**: Compile-time message type verification
/// - **Zero Overhead**: No runtime type checking or reflection
/// - **Flexibility**: Support for custom priority levels per message type
///
/// # Example
/// ```rust
/// use airssys_cluster::message::{Message, MessagePriority};
/// 
/// #[derive(Debug, Clone)]
/// struct MyMessage {
///     data: String,
/// }
///
/// impl Message for MyMessage {
///     const MESSAGE_TYPE: &'static str = "my_message";
///     
///     fn priority(&self) -> MessagePriority {
///         MessagePriority::High
///     }
/// }
/// ```
pub trait Message: Send + Sync + Clone + Debug + 'static {
    /// Unique message type identifier (compile-time constant)
    /// 
    /// This const allows message type identification without runtime reflection,
    /// enabling zero-cost message routing and handling.
    const MESSAGE_TYPE: &'static str;
    
    /// Message routing priority (default: Normal)
    /// 
    /// Override this method to provide custom priority levels for specific
    /// message types. Higher priority messages are processed before lower
    /// priority messages in the actor mailbox.
    fn priority(&self) -> MessagePriority {
        MessagePriority::Normal
    }
}

/// Message priority levels for routing and processing
/// 
/// Defines the relative importance of messages for mailbox processing order.
/// Messages are processed in priority order, with higher priority messages
/// being handled before lower priority ones.
///
/// # Priority Ordering
/// Critical > High > Normal > Low
///
/// # Example
/// ```rust
/// use airssys_cluster::message::MessagePriority;
/// 
/// assert!(MessagePriority::Critical > MessagePriority::High);
/// assert!(MessagePriority::High > MessagePriority::Normal);
/// assert!(MessagePriority::Normal > MessagePriority::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessagePriority {
    /// Background processing (lowest priority)
    /// 
    /// Use for non-critical maintenance tasks, cleanup operations,
    /// or analytics that can be deferred.
    Low = 0,
    
    /// Default priority for normal messages
    /// 
    /// Standard priority for routine business logic and operations.
    Normal = 1,
    
    /// High priority for important messages
    /// 
    /// Use for time-sensitive operations or user-facing requests
    /// that should be handled promptly.
    High = 2,
    
    /// Highest priority for critical system messages
    /// 
    /// Reserved for system-critical operations like shutdown signals,
    /// supervisor commands, or health check responses.
    Critical = 3,
}

impl Default for MessagePriority {
    fn default() -> Self {
        Self::Normal
    }
}
