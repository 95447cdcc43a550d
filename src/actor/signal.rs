//! Framework-originated lifecycle signals, delivered alongside (not
//! instead of) the existing `pre_start`/`post_stop` hooks.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::watch::TerminationReason;
use crate::util::ActorAddress;

/// A signal delivered to an actor outside the normal `handle_message` flow.
///
/// Signals are framework events, not user messages: they never pass through
/// a mailbox's backpressure policy and are always delivered, one at a time,
/// between message-handling frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    PreStart,
    PreRestart { cause: String },
    PostStop,
    Terminated {
        child: ActorAddress,
        reason: TerminationReason,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminated_carries_reason() {
        let signal = Signal::Terminated {
            child: ActorAddress::named("child"),
            reason: TerminationReason::Killed,
        };
        match signal {
            Signal::Terminated { reason, .. } => assert_eq!(reason, TerminationReason::Killed),
            _ => unreachable!(),
        }
    }
}
