//! Framework-command interception (REDESIGN FLAGS).
//!
//! User mailboxes carry `Command<U>` rather than a bare `U`: the dispatcher
//! can then intercept `Stop`/`Restart` requests without the user's message
//! enum having to reserve variants for them, and without a second,
//! separately-scheduled channel competing for the single-consumer
//! ordering guarantee the mailbox gives the rest of the spec.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::message::{Message, MessagePriority};

/// A framework command interleaved with user messages in the same
/// mailbox, always at `Critical` priority so it jumps ahead of queued
/// user traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameworkCommand {
    /// Stop after the current message finishes processing.
    Stop,
    /// Stop, then `pre_start` again (restart).
    Restart { cause: String },
    /// Suspend message processing until `Resume` (used during handover).
    Suspend,
    Resume,
}

/// Wraps a user message type `U` so the dispatcher can distinguish
/// framework commands from application traffic without `U` knowing about
/// either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command<U> {
    User(U),
    Framework(FrameworkCommand),
}

impl<U: Message> Message for Command<U> {
    const MESSAGE_TYPE: &'static str = "command";

    fn priority(&self) -> MessagePriority {
        match self {
            Command::User(u) => u.priority(),
            Command::Framework(_) => MessagePriority::Critical,
        }
    }
}

impl<U> Command<U> {
    pub fn user(message: U) -> Self {
        Self::User(message)
    }

    pub fn is_framework(&self) -> bool {
        matches!(self, Self::Framework(_))
    }

    pub fn into_user(self) -> Option<U> {
        match self {
            Self::User(u) => Some(u),
            Self::Framework(_) => None,
        }
    }
}
