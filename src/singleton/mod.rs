//! Cluster singleton: exactly one instance of a given actor alive across
//! the whole cluster at a time, hosted on the current leader (or on the
//! oldest member of a configured role) and handed over when that node
//! leaves.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

// Layer 3: Internal module imports
use crate::actor::{ActorRef, RoutingHint};
use crate::mailbox::MailboxError;
use crate::message::{Message, MessageEnvelope};
use crate::util::NodeAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingletonPhase {
    /// No instance running anywhere known to this node yet.
    Idle,
    /// This node is hosting the singleton.
    Active,
    /// Another node is hosting it and this node has a working proxy route.
    Remote(NodeAddress),
    /// The previous host is leaving; waiting for the new host to start
    /// before resuming delivery.
    HandingOver,
}

impl fmt::Display for SingletonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Active => write!(f, "active"),
            Self::Remote(node) => write!(f, "remote({node})"),
            Self::HandingOver => write!(f, "handing-over"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SingletonConfig {
    pub name: String,
    pub role: Option<String>,
    pub buffer_size: usize,
    pub handover_timeout: std::time::Duration,
}

impl SingletonConfig {
    pub fn builder(name: impl Into<String>) -> SingletonConfigBuilder {
        SingletonConfigBuilder {
            config: Self {
                name: name.into(),
                role: None,
                buffer_size: 1000,
                handover_timeout: std::time::Duration::from_secs(10),
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("singleton name must not be empty".into());
        }
        if self.buffer_size == 0 {
            return Err("singleton buffer_size must be greater than zero".into());
        }
        Ok(())
    }
}

pub struct SingletonConfigBuilder {
    config: SingletonConfig,
}

impl SingletonConfigBuilder {
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.config.role = Some(role.into());
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    pub fn with_handover_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.handover_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<SingletonConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[derive(Debug, Error)]
pub enum SingletonError {
    #[error("singleton {name} has no known host yet")]
    NoHost { name: String },

    #[error("singleton {name} is mid-handover; message was buffered")]
    Buffered { name: String },

    #[error("singleton {name} proxy buffer is full, message dropped")]
    BufferFull { name: String },

    #[error(transparent)]
    Mailbox(#[from] MailboxError),
}

/// Manages whether this node should be hosting the singleton, based on
/// leadership: the manager starts the instance when this node becomes
/// leader (and matches the configured role, if any), and stops it when
/// leadership moves away.
pub struct SingletonManager<M: Message> {
    config: SingletonConfig,
    phase: RwLock<SingletonPhase>,
    active_ref: RwLock<Option<ActorRef<M>>>,
}

impl<M: Message> SingletonManager<M> {
    pub fn new(config: SingletonConfig) -> Self {
        Self {
            config,
            phase: RwLock::new(SingletonPhase::Idle),
            active_ref: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn phase(&self) -> SingletonPhase {
        *self.phase.read()
    }

    /// Called by the cluster system when this node takes over hosting the
    /// instance (leadership gained and role, if any, matches).
    pub fn mark_active(&self, instance: ActorRef<M>) {
        *self.active_ref.write() = Some(instance);
        *self.phase.write() = SingletonPhase::Active;
        info!(singleton = %self.config.name, "now hosting singleton instance");
    }

    /// Called when a remote node is known to be hosting the instance.
    pub fn mark_remote(&self, host: NodeAddress, instance: ActorRef<M>) {
        *self.active_ref.write() = Some(instance);
        *self.phase.write() = SingletonPhase::Remote(host);
    }

    /// Called when the current host starts leaving, before a successor is
    /// known: proxies must buffer rather than drop until the handover
    /// completes.
    pub fn begin_handover(&self) {
        *self.phase.write() = SingletonPhase::HandingOver;
        debug!(singleton = %self.config.name, "handover started");
    }

    pub fn current_ref(&self) -> Option<ActorRef<M>> {
        self.active_ref.read().clone()
    }
}

/// A stable client-facing handle that survives handovers: messages are
/// either delivered to the current instance or buffered in an internal
/// mpsc channel while one isn't known, draining once the manager reports
/// a new active ref.
#[derive(Clone)]
pub struct SingletonProxy<M: Message> {
    manager: Arc<SingletonManager<M>>,
    overflow: mpsc::Sender<MessageEnvelope<M>>,
}

impl<M: Message> SingletonProxy<M> {
    pub fn new(manager: Arc<SingletonManager<M>>) -> (Self, mpsc::Receiver<MessageEnvelope<M>>) {
        let (tx, rx) = mpsc::channel(manager.config.buffer_size);
        (
            Self {
                manager,
                overflow: tx,
            },
            rx,
        )
    }

    pub async fn tell(&self, envelope: MessageEnvelope<M>) -> Result<(), SingletonError> {
        match self.manager.phase() {
            SingletonPhase::Active | SingletonPhase::Remote(_) => {
                if let Some(target) = self.manager.current_ref() {
                    if matches!(target.routing(), RoutingHint::Unresolved) {
                        self.buffer(envelope)?;
                        return Ok(());
                    }
                    return target.tell(envelope).await.map_err(Into::into);
                }
                self.buffer(envelope)
            }
            SingletonPhase::Idle | SingletonPhase::HandingOver => self.buffer(envelope),
        }
    }

    fn buffer(&self, envelope: MessageEnvelope<M>) -> Result<(), SingletonError> {
        self.overflow.try_send(envelope).map_err(|_| SingletonError::BufferFull {
            name: self.manager.config.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorId, LocalSender};
    use crate::message::MessagePriority;
    use crate::util::ActorPath;
    use async_trait::async_trait;

    #[derive(Debug, Clone)]
    struct Tick;
    impl Message for Tick {
        const MESSAGE_TYPE: &'static str = "tick";
        fn priority(&self) -> MessagePriority {
            MessagePriority::Normal
        }
    }

    struct NullSender;
    #[async_trait]
    impl LocalSender<Tick> for NullSender {
        async fn send_local(&self, _envelope: MessageEnvelope<Tick>) -> Result<(), MailboxError> {
            Ok(())
        }
    }

    #[test]
    fn config_rejects_empty_name() {
        let err = SingletonConfig::builder("").build().unwrap_err();
        assert!(err.contains("name"));
    }

    #[test]
    fn manager_starts_idle() {
        let manager: SingletonManager<Tick> =
            SingletonManager::new(SingletonConfig::builder("scheduler").build().unwrap());
        assert_eq!(manager.phase(), SingletonPhase::Idle);
    }

    #[tokio::test]
    async fn proxy_buffers_while_idle_and_delivers_once_active() {
        let manager = Arc::new(SingletonManager::<Tick>::new(
            SingletonConfig::builder("scheduler").build().unwrap(),
        ));
        let (proxy, mut overflow) = SingletonProxy::new(manager.clone());

        proxy.tell(MessageEnvelope::new(Tick)).await.unwrap();
        assert!(overflow.try_recv().is_ok());

        let path = ActorPath::new(None, vec!["user".into(), "scheduler".into()]);
        manager.mark_active(ActorRef::local(ActorId::new(), path, NullSender));
        proxy.tell(MessageEnvelope::new(Tick)).await.unwrap();
        assert!(overflow.try_recv().is_err());
    }

    #[test]
    fn begin_handover_moves_out_of_active() {
        let manager = SingletonManager::<Tick>::new(SingletonConfig::builder("scheduler").build().unwrap());
        let path = ActorPath::new(None, vec!["user".into(), "scheduler".into()]);
        manager.mark_active(ActorRef::local(ActorId::new(), path, NullSender));
        manager.begin_handover();
        assert_eq!(manager.phase(), SingletonPhase::HandingOver);
    }
}
