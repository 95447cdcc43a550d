//! The cluster receptionist: a location-transparent service registry keyed
//! by typed [`ServiceKey`]s, grounded on the teacher's `DashMap`-backed
//! in-process registries (`broker`/`mailbox`) generalized to hold refs for
//! many actors under one key instead of one sender per address.

// Layer 1: Standard library imports
use std::any::{type_name, TypeId};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use tokio::sync::broadcast;

// Layer 3: Internal module imports
use crate::actor::watch::WatchHandle;
use crate::actor::ActorRef;
use crate::message::Message;

/// A typed name under which actors register themselves for discovery.
/// Equality and hashing include the message type, so `ServiceKey::<Ping>`
/// and `ServiceKey::<Pong>` sharing the string `"printer"` never collide.
#[derive(Clone)]
pub struct ServiceKey<M: Message> {
    id: String,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Message> ServiceKey<M> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            _marker: PhantomData,
        }
    }

    fn registry_key(&self) -> (TypeId, String) {
        (TypeId::of::<M>(), self.id.clone())
    }
}

impl<M: Message> std::fmt::Debug for ServiceKey<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServiceKey<{}>({})", type_name::<M>(), self.id)
    }
}

/// A point-in-time set of registered refs for one key, delivered both as
/// the reply to `find` and pushed to `subscribe`rs on every change.
#[derive(Clone)]
pub struct Listing<M: Message> {
    pub service_id: String,
    pub refs: Vec<ActorRef<M>>,
}

struct Registration {
    // Type-erased behind `Box<dyn Any>` would require downcasting on every
    // read; instead each entry is stored pre-erased as the serialized
    // ActorRef path set, and the typed `ActorRef<M>` is reconstructed by
    // the caller's own bookkeeping. Kept simple: store the refs behind a
    // type-erased Arc<dyn Any + Send + Sync> and downcast at lookup time.
    refs: Arc<dyn std::any::Any + Send + Sync>,
    change_tx: broadcast::Sender<()>,
}

/// Process-local (per-node) receptionist. `system::cluster_system` merges
/// registrations gossiped from peers into the same map under a
/// node-qualified key prefix — out of scope for this type, which only
/// owns the storage and change-notification primitive.
#[derive(Clone)]
pub struct Receptionist {
    registry: Arc<DashMap<(TypeId, String), Registration>>,
    watches: WatchHandle,
}

impl Default for Receptionist {
    fn default() -> Self {
        Self::new()
    }
}

impl Receptionist {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(DashMap::new()),
            watches: WatchHandle::new(),
        }
    }

    /// Register `actor_ref` under `key`. The ref is watched for the
    /// lifetime of the registration: when it terminates, it is removed
    /// from this (and every other) key it was registered under, cluster-wide
    /// service discovery never hands out a ref to a dead actor.
    pub fn register<M: Message>(&self, key: &ServiceKey<M>, actor_ref: ActorRef<M>) {
        let registry_key = key.registry_key();
        let entry = self
            .registry
            .entry(registry_key)
            .or_insert_with(|| Registration {
                refs: Arc::new(parking_lot::RwLock::new(HashSet::<ActorRef<M>>::new())),
                change_tx: broadcast::channel(16).0,
            });
        let set = entry
            .refs
            .clone()
            .downcast::<parking_lot::RwLock<HashSet<ActorRef<M>>>>()
            .expect("registry entry type matches its ServiceKey<M>");
        set.write().insert(actor_ref.clone());
        let _ = entry.change_tx.send(());
        drop(entry);

        let target = actor_ref.address();
        let receptionist = self.clone();
        let watched_key = key.clone();
        self.watches.register(
            target.clone(),
            target,
            Box::new(move |_addr, _reason| {
                receptionist.deregister(&watched_key, &actor_ref);
            }),
        );
    }

    pub fn deregister<M: Message>(&self, key: &ServiceKey<M>, actor_ref: &ActorRef<M>) {
        let registry_key = key.registry_key();
        if let Some(entry) = self.registry.get(&registry_key) {
            if let Ok(set) = entry
                .refs
                .clone()
                .downcast::<parking_lot::RwLock<HashSet<ActorRef<M>>>>()
            {
                set.write().remove(actor_ref);
                let _ = entry.change_tx.send(());
            }
        }
    }

    pub fn find<M: Message>(&self, key: &ServiceKey<M>) -> Listing<M> {
        let registry_key = key.registry_key();
        let refs = match self.registry.get(&registry_key) {
            Some(entry) => match entry
                .refs
                .clone()
                .downcast::<parking_lot::RwLock<HashSet<ActorRef<M>>>>()
            {
                Ok(set) => set.read().iter().cloned().collect(),
                Err(_) => Vec::new(),
            },
            None => Vec::new(),
        };
        Listing {
            service_id: registry_key.1,
            refs,
        }
    }

    /// A change-notification channel for `key`. The subscriber gets one `()`
    /// tick immediately for the current state, then another on every later
    /// register/deregister; callers re-`find` on each tick to get the
    /// matching listing, the at-least-once, read-the-latest-state contract
    /// real subscribe APIs use rather than trying to deliver a precise diff.
    pub fn subscribe<M: Message>(&self, key: &ServiceKey<M>) -> broadcast::Receiver<()> {
        let registry_key = key.registry_key();
        let entry = self
            .registry
            .entry(registry_key)
            .or_insert_with(|| Registration {
                refs: Arc::new(parking_lot::RwLock::new(HashSet::<ActorRef<M>>::new())),
                change_tx: broadcast::channel(16).0,
            });
        let rx = entry.change_tx.subscribe();
        let _ = entry.change_tx.send(());
        rx
    }
}
