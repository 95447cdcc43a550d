//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits for building
//! actor systems with airssys-rt. Import this module to get started quickly:
//!
//! ```rust
//! use airssys_cluster::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Core Actor System
//! - [`Actor`] - Core trait for actors
//! - [`ActorContext`] - Actor execution context
//! - [`ActorLifecycle`] - Actor lifecycle tracking
//! - [`ActorState`] - Lifecycle state enum
//! - [`ErrorAction`] - Supervision decision enum
//!
//! ## Messaging
//! - [`Message`] - Core trait for messages
//! - [`MessageEnvelope`] - Message wrapper with metadata
//! - [`MessagePriority`] - Priority levels (High, Normal, Low)
//!
//! ## Mailbox
//! - [`BoundedMailbox`] - Capacity-limited mailbox
//! - [`UnboundedMailbox`] - Unlimited capacity mailbox
//! - [`BackpressureStrategy`] - Flow control strategies
//! - [`MailboxReceiver`] - Trait for receiving messages
//! - [`MailboxSender`] - Trait for sending messages
//!
//! ## Message Broker
//! - [`MessageBroker`] - Core routing trait
//! - [`InMemoryMessageBroker`] - Default broker implementation
//!
//! ## Supervision
//! - [`Child`] - Trait for supervised entities
//! - [`Supervisor`] - Supervisor trait
//! - [`SupervisorNode`] - Supervisor implementation
//! - [`OneForOne`] - Independent child strategy
//! - [`OneForAll`] - Restart all strategy
//! - [`RestForOne`] - Restart following strategy
//! - [`RestartPolicy`] - When to restart (Permanent, Transient, Temporary)
//! - [`ShutdownPolicy`] - How to stop (Graceful, Immediate, Infinity)
//! - [`ChildSpec`] - Child specification
//! - [`ChildHealth`] - Health status enum
//! - [`ChildState`] - Child lifecycle state
//!
//! ## Monitoring
//! - [`Monitor`] - Core monitoring trait
//! - [`InMemoryMonitor`] - Production monitor
//! - [`NoopMonitor`] - Zero-overhead no-op monitor
//! - [`MonitoringEvent`] - Trait for events
//! - [`EventSeverity`] - Event severity levels
//! - [`ActorEvent`] - Actor lifecycle events
//! - [`SupervisionEvent`] - Supervision events
//! - [`MailboxEvent`] - Mailbox events
//! - [`BrokerEvent`] - Broker events
//! - [`ClusterMonitorEvent`] - Membership, gossip and SBR events
//! - [`ShardingEvent`] - Shard allocation and entity lifecycle events
//! - [`SingletonEvent`] - Singleton activation and handover events
//!
//! ## Cluster Membership
//! - [`ClusterState`] - Local membership view, gossip and leader election
//! - [`ClusterEvent`] - Membership change notifications
//! - [`Member`] / [`MemberStatus`] - Member records and their lifecycle states
//!
//! ## Sharding and Singleton
//! - [`ShardCoordinator`] - Shard-to-node allocation
//! - [`ShardRegion`] - Per-node entity hosting and lazy spawn
//! - [`MessageExtractor`] - Entity id / shard id extraction for a message type
//! - [`SingletonManager`] - Cluster singleton lifecycle and phase tracking
//! - [`SingletonConfig`] - Singleton configuration (name, role, handover timeout)
//! - [`SingletonProxy`] - Location-transparent handle to the active singleton
//!
//! ## Receptionist and Pub/Sub
//! - [`Receptionist`] - Cluster-wide typed service discovery
//! - [`ServiceKey`] / [`Listing`] - Typed lookup key and its matching refs
//! - [`PubSub`] / [`Topic`] - Distributed publish/subscribe over the receptionist
//!
//! ## System
//! - [`SystemConfig`] - Actor system configuration
//!
//! ## Utilities
//! - [`ActorAddress`] - Actor address type
//! - [`ActorId`] - Actor identifier
//! - [`MessageId`] - Message identifier
//! - [`ActorPath`] - Hierarchical actor path
//! - [`NodeAddress`] - Cluster node identity
//!
//! # Example
//!
//! ```rust,ignore
//! use airssys_cluster::prelude::*;
//! use async_trait::async_trait;
//!
//! #[derive(Debug, Clone)]
//! struct MyMessage {
//!     data: String,
//! }
//!
//! impl Message for MyMessage {
//!     const MESSAGE_TYPE: &'static str = "my_message";
//! }
//!
//! struct MyActor {
//!     count: u64,
//! }
//!
//! #[async_trait]
//! impl Actor for MyActor {
//!     type Message = MyMessage;
//!     type Error = std::io::Error;
//!     
//!     async fn handle_message<B: MessageBroker<Self::Message>>(
//!         &mut self,
//!         msg: Self::Message,
//!         ctx: &mut ActorContext<Self::Message, B>,
//!     ) -> Result<(), Self::Error> {
//!         self.count += 1;
//!         println!("Received: {}", msg.data);
//!         Ok(())
//!     }
//! }
//! ```

// Core actor system
pub use crate::actor::{Actor, ActorContext, ActorLifecycle, ActorState, ErrorAction};

// Messaging
pub use crate::message::{Message, MessageEnvelope, MessagePriority};

// Mailbox
pub use crate::mailbox::{
    BackpressureStrategy, BoundedMailbox, BoundedMailboxSender, MailboxReceiver, MailboxSender,
    UnboundedMailbox, UnboundedMailboxSender,
};

// Message broker
pub use crate::broker::{InMemoryMessageBroker, MessageBroker};

// Supervision
pub use crate::supervisor::{
    Child, ChildHealth, ChildId, ChildSpec, ChildState, OneForAll, OneForOne, RestForOne,
    RestartPolicy, ShutdownPolicy, Supervisor, SupervisorNode,
};

// Monitoring
pub use crate::monitoring::{
    ActorEvent, BrokerEvent, ClusterMonitorEvent, EventSeverity, InMemoryMonitor, MailboxEvent,
    Monitor, MonitoringEvent, NoopMonitor, ShardingEvent, SingletonEvent, SupervisionEvent,
};

// System
pub use crate::system::SystemConfig;

// Utilities
pub use crate::util::{ActorAddress, ActorId, ActorPath, MessageId, NodeAddress};

// Location-transparent refs, ask pattern, watch/Terminated
pub use crate::actor::{
    ask, ActorRef, AskError, AskHandle, Command, FrameworkCommand, LocalSender, RoutingHint,
    Signal, TerminationReason, WatchHandle,
};

// Cluster membership
pub use crate::cluster::{ClusterError, ClusterEvent, ClusterState, Member, MemberStatus};

// Receptionist and pub/sub
pub use crate::pubsub::{PubSub, Topic};
pub use crate::receptionist::{Listing, Receptionist, ServiceKey};

// Singleton and sharding
pub use crate::sharding::{MessageExtractor, ShardCoordinator, ShardRegion};
pub use crate::singleton::{SingletonConfig, SingletonManager, SingletonProxy};

// Top-level error aggregate
pub use crate::error::AirssysClusterError;
