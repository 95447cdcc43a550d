//! Per-actor execution context: identity, clock, and the broker handle used
//! to reach other actors.

// Layer 1: Standard library imports
use std::marker::PhantomData;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
use crate::actor::watch::WatchHandle;
use crate::broker::MessageBroker;
use crate::message::Message;
use crate::util::{ActorAddress, ActorId, ActorPath};

/// Actor context: metadata plus the messaging handle passed to every
/// `Actor` lifecycle and message-handling call.
///
/// Generic over the broker type `B` rather than boxing it, so sending a
/// message from inside a handler costs exactly one virtual-free call into
/// `B::send`.
pub struct ActorContext<M: Message, B: MessageBroker<M>> {
    address: ActorAddress,
    path: ActorPath,
    id: ActorId,
    created_at: DateTime<Utc>,
    broker: B,
    watches: WatchHandle,
    _marker: PhantomData<M>,
}

impl<M: Message, B: MessageBroker<M>> ActorContext<M, B> {
    /// Create a new actor context rooted at `user/<name-or-id>`.
    pub fn new(address: ActorAddress, broker: B) -> Self {
        Self::with_path_and_watches(address, broker, WatchHandle::new())
    }

    /// Create a context with an explicit watch registry handle, used when a
    /// system wires multiple actors through one shared watcher.
    pub fn with_path_and_watches(address: ActorAddress, broker: B, watches: WatchHandle) -> Self {
        let segment = address
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| address.id().to_string());
        let path = ActorPath::new(None, vec!["user".to_string(), segment]);
        Self {
            id: *address.id(),
            address,
            path,
            created_at: Utc::now(), // §3.2
            broker,
            watches,
            _marker: PhantomData,
        }
    }

    pub fn address(&self) -> &ActorAddress {
        &self.address
    }

    pub fn path(&self) -> &ActorPath {
        &self.path
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The broker through which this actor reaches others.
    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Register interest in `target`'s termination; a `Signal::Terminated`
    /// is delivered to this actor's signal channel when it stops.
    pub fn watch(&self, target: ActorAddress) {
        self.watches.watch(self.address.clone(), target);
    }

    pub fn unwatch(&self, target: &ActorAddress) {
        self.watches.unwatch(&self.address, target);
    }
}
