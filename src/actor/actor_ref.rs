//! Location-transparent actor references.
//!
//! An [`ActorRef`] is what callers hold and pass around; it never exposes
//! whether the target is in this process, on a remote cluster member, or
//! behind a shard coordinator. Equality and hashing are defined by
//! [`ActorPath`] alone — two refs to the same actor compare equal even if
//! their routing hints differ (e.g. one was resolved locally, the other
//! reconstructed from a gossip message).

// Layer 1: Standard library imports
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::mailbox::{MailboxError, MailboxSender};
use crate::message::{Message, MessageEnvelope};
use crate::util::{ActorAddress, ActorId, ActorPath, NodeAddress};

/// Object-safe sender facade so [`RoutingHint::Local`] can hold any concrete
/// mailbox sender behind one pointer. This is the one deliberate exception to
/// the crate's no-`dyn` rule: it exists at exactly the seam where the wire
/// protocol itself is already type-erased (serializer id + manifest), not in
/// the hot path of actor dispatch.
#[async_trait]
pub trait LocalSender<M: Message>: Send + Sync {
    async fn send_local(&self, envelope: MessageEnvelope<M>) -> Result<(), MailboxError>;
}

#[async_trait]
impl<M, S> LocalSender<M> for S
where
    M: Message,
    S: MailboxSender<M> + 'static,
    S::Error: Into<MailboxError>,
{
    async fn send_local(&self, envelope: MessageEnvelope<M>) -> Result<(), MailboxError> {
        MailboxSender::send(self, envelope)
            .await
            .map_err(Into::into)
    }
}

/// How a ref currently believes it can reach its target.
///
/// `Unresolved` refs can still be compared and displayed (their path is
/// known), they just cannot be sent to until something resolves them —
/// e.g. a freshly constructed sharded-entity reference before the shard
/// coordinator answers.
#[derive(Clone)]
pub enum RoutingHint<M: Message> {
    Local(Arc<dyn LocalSender<M>>),
    Remote(NodeAddress),
    Shard {
        coordinator: NodeAddress,
        shard_id: String,
    },
    Unresolved,
}

impl<M: Message> Debug for RoutingHint<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(_) => write!(f, "RoutingHint::Local"),
            Self::Remote(node) => write!(f, "RoutingHint::Remote({node})"),
            Self::Shard {
                coordinator,
                shard_id,
            } => write!(f, "RoutingHint::Shard({coordinator}, {shard_id})"),
            Self::Unresolved => write!(f, "RoutingHint::Unresolved"),
        }
    }
}

/// A location-transparent, typed reference to an actor.
///
/// Equality, `Hash`, `Display` and `Ord` are all defined on `path` only —
/// `routing` is metadata about how *this process* currently reaches the
/// target, not part of the actor's identity.
#[derive(Clone)]
pub struct ActorRef<M: Message> {
    id: ActorId,
    path: ActorPath,
    routing: RoutingHint<M>,
}

impl<M: Message> ActorRef<M> {
    pub fn new(id: ActorId, path: ActorPath, routing: RoutingHint<M>) -> Self {
        Self { id, path, routing }
    }

    pub fn local(id: ActorId, path: ActorPath, sender: impl LocalSender<M> + 'static) -> Self {
        Self::new(id, path, RoutingHint::Local(Arc::new(sender)))
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn path(&self) -> &ActorPath {
        &self.path
    }

    pub fn routing(&self) -> &RoutingHint<M> {
        &self.routing
    }

    /// The [`ActorAddress`] this ref resolves to — named if its path carries
    /// a name segment, anonymous otherwise. Used wherever a ref needs to be
    /// looked up or watched by address rather than by path (the receptionist,
    /// the ask pattern's delivery-failure reporting).
    pub fn address(&self) -> ActorAddress {
        match self.path.name() {
            Some(name) => ActorAddress::Named {
                id: self.id,
                name: name.to_string(),
            },
            None => ActorAddress::Anonymous { id: self.id },
        }
    }

    /// `true` if this ref has a known delivery route right now.
    pub fn is_resolved(&self) -> bool {
        !matches!(self.routing, RoutingHint::Unresolved)
    }

    /// Rebind routing without changing identity — used when a shard
    /// coordinator resolves a previously `Unresolved` entity ref.
    pub fn with_routing(mut self, routing: RoutingHint<M>) -> Self {
        self.routing = routing;
        self
    }

    /// Fire-and-forget delivery via whatever routing is currently known.
    ///
    /// Remote and shard delivery are handled by the transport/sharding
    /// layers, which construct envelopes addressed by path and push them
    /// onto the outbound connection; this method only covers the common,
    /// zero-copy local case directly.
    pub async fn tell(&self, envelope: MessageEnvelope<M>) -> Result<(), MailboxError> {
        match &self.routing {
            RoutingHint::Local(sender) => sender.send_local(envelope).await,
            RoutingHint::Remote(_) | RoutingHint::Shard { .. } | RoutingHint::Unresolved => {
                Err(MailboxError::Closed)
            }
        }
    }
}

impl<M: Message> Debug for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("id", &self.id)
            .field("path", &self.path)
            .finish()
    }
}

impl<M: Message> Display for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl<M: Message> PartialEq for ActorRef<M> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<M: Message> Eq for ActorRef<M> {}

impl<M: Message> Hash for ActorRef<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
