//! Distributed publish/subscribe, built directly on the receptionist: a
//! topic is just a well-known service key under the `"topic:"` namespace,
//! and subscribing means registering your ref under that key.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tracing::debug;

// Layer 3: Internal module imports
use crate::actor::ActorRef;
use crate::mailbox::MailboxError;
use crate::message::{Message, MessageEnvelope};
use crate::receptionist::{Receptionist, ServiceKey};

fn topic_key<M: Message>(topic: &str) -> ServiceKey<M> {
    ServiceKey::new(format!("topic:{topic}"))
}

/// A handle to one named topic for message type `M`. Cheap to clone; all
/// clones share the same underlying receptionist registration.
#[derive(Clone)]
pub struct Topic<M: Message> {
    name: String,
    key: ServiceKey<M>,
    receptionist: Receptionist,
}

impl<M: Message> Topic<M> {
    pub fn new(receptionist: Receptionist, name: impl Into<String>) -> Self {
        let name = name.into();
        let key = topic_key(&name);
        Self {
            name,
            key,
            receptionist,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registering under the topic's service key is all subscribing is —
    /// including the receptionist's watch on `subscriber`, so a terminated
    /// subscriber drops off the topic on its own with no further action
    /// needed here.
    pub fn subscribe(&self, subscriber: ActorRef<M>) {
        self.receptionist.register(&self.key, subscriber);
    }

    pub fn unsubscribe(&self, subscriber: &ActorRef<M>) {
        self.receptionist.deregister(&self.key, subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.receptionist.find(&self.key).refs.len()
    }

    /// Fan a message out to every current subscriber. Best-effort: a
    /// subscriber whose mailbox has since closed does not block or fail
    /// delivery to the others, and is reported back so callers can decide
    /// whether to treat a fully-failed publish as an error.
    pub async fn publish(&self, message: M) -> PublishReport
    where
        M: Clone,
    {
        let listing = self.receptionist.find(&self.key);
        let mut delivered = 0usize;
        let mut failed = Vec::new();
        for subscriber in &listing.refs {
            let envelope = MessageEnvelope::new(message.clone());
            match subscriber.tell(envelope).await {
                Ok(()) => delivered += 1,
                Err(err) => failed.push((subscriber.path().clone(), err)),
            }
        }
        if !failed.is_empty() {
            debug!(topic = %self.name, failed = failed.len(), "publish had undeliverable subscribers");
        }
        PublishReport {
            attempted: listing.refs.len(),
            delivered,
            failed,
        }
    }
}

#[derive(Debug)]
pub struct PublishReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: Vec<(crate::util::ActorPath, MailboxError)>,
}

impl PublishReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Factory mirroring the receptionist's own cheap-clone, shared-registry
/// design: one `PubSub` per `ClusterSystem`, handing out `Topic` handles.
#[derive(Clone)]
pub struct PubSub {
    receptionist: Receptionist,
}

impl PubSub {
    pub fn new(receptionist: Receptionist) -> Self {
        Self { receptionist }
    }

    pub fn topic<M: Message>(&self, name: impl Into<String>) -> Topic<M> {
        Topic::new(self.receptionist.clone(), name)
    }
}
