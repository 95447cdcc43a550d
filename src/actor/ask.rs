//! The ask pattern: request/response over the otherwise fire-and-forget
//! actor model, built from an ephemeral, single-shot reply mailbox rather
//! than a broker-level request/reply round trip.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::{timeout, Duration};
use tracing::warn;

// Layer 3: Internal module imports
use crate::actor::actor_ref::LocalSender;
use crate::actor::ActorRef;
use crate::mailbox::MailboxError;
use crate::message::{Message, MessageEnvelope};
use crate::util::{ActorAddress, ActorId, ActorPath};

/// Failure modes specific to an in-flight ask.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("ask to {target} timed out after {elapsed_ms}ms")]
    Timeout { target: ActorAddress, elapsed_ms: u64 },

    #[error("ask to {target} was cancelled before a reply arrived")]
    Cancelled { target: ActorAddress },

    #[error("failed to deliver ask request to {target}")]
    DeliveryFailed { target: ActorAddress },
}

/// A pending ask, cancellable by dropping it.
pub struct AskHandle<Reply> {
    receiver: oneshot::Receiver<Reply>,
    target: ActorAddress,
    deadline: Duration,
}

impl<Reply> AskHandle<Reply> {
    /// Await the reply, racing the configured deadline.
    pub async fn recv(self) -> Result<Reply, AskError> {
        let target = self.target.clone();
        match timeout(self.deadline, self.receiver).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_canceled)) => Err(AskError::Cancelled { target }),
            Err(_elapsed) => Err(AskError::Timeout {
                target,
                elapsed_ms: self.deadline.as_millis() as u64,
            }),
        }
    }
}

impl<Reply> fmt::Debug for AskHandle<Reply> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AskHandle")
            .field("target", &self.target)
            .field("deadline", &self.deadline)
            .finish()
    }
}

/// The ephemeral reply mailbox an [`ActorRef<Reply>`] handed to `build_request`
/// is backed by. Delivers exactly once: the first `tell` consumes the
/// oneshot sender, every later `tell` (a misbehaving actor replying twice)
/// finds it already gone and is rejected instead of silently dropped.
struct ReplySender<Reply> {
    tx: Mutex<Option<oneshot::Sender<Reply>>>,
    reply_to: ActorAddress,
}

#[async_trait]
impl<Reply: Message> LocalSender<Reply> for ReplySender<Reply> {
    async fn send_local(&self, envelope: MessageEnvelope<Reply>) -> Result<(), MailboxError> {
        match self.tx.lock().take() {
            Some(tx) => {
                // A dropped `AskHandle` closes the receiver before the reply
                // lands; that's a cancelled ask, not a delivery failure.
                let _ = tx.send(envelope.payload);
                Ok(())
            }
            None => {
                warn_unused_reply(&self.reply_to);
                Err(MailboxError::Closed)
            }
        }
    }
}

/// Send `request` to `target` and return a handle that resolves to exactly
/// one `Reply`. A second attempt to complete the handle (e.g. the target
/// misbehaves and replies twice) is logged and dropped, never delivered.
///
/// `build_request` receives a live [`ActorRef<Reply>`] bound to the
/// ephemeral reply mailbox; the caller embeds it in the outgoing message
/// (e.g. as a `reply_to: ActorRef<Reply>` field) and the recipient replies
/// by calling `.tell()` on it directly, the same way it would reach any
/// other actor — no broker or registry lookup involved.
pub async fn ask<M, Reply, F>(
    target: &ActorRef<M>,
    build_request: F,
    deadline: Duration,
) -> Result<AskHandle<Reply>, AskError>
where
    M: Message,
    Reply: Message,
    F: FnOnce(ActorRef<Reply>) -> MessageEnvelope<M>,
{
    let (tx, rx) = oneshot::channel::<Reply>();
    let reply_to = ActorAddress::anonymous();
    let reply_path = ActorPath::new(None, vec!["ask".to_string(), reply_to.to_string()]);
    let reply_ref = ActorRef::local(
        *reply_to.id(),
        reply_path,
        ReplySender {
            tx: Mutex::new(Some(tx)),
            reply_to: reply_to.clone(),
        },
    );

    let envelope = build_request(reply_ref);

    target
        .tell(envelope)
        .await
        .map_err(|_| AskError::DeliveryFailed {
            target: target.address(),
        })?;

    Ok(AskHandle {
        receiver: rx,
        target: target.address(),
        deadline,
    })
}

/// Logged when a reply channel's sender is dropped or reused without a
/// matching receiver — surfaced here rather than silently swallowed so
/// misbehaving actors are visible in traces.
pub fn warn_unused_reply(target: &ActorAddress) {
    warn!(target = %target, "ask reply channel closed without a reply");
}
