//! The shard region: hosts active entities locally and forwards messages
//! for entities it doesn't yet (or no longer) host.

// Layer 1: Standard library imports
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

// Layer 3: Internal module imports
use crate::actor::ActorRef;
use crate::message::Message;
use crate::sharding::shard_id_for;

/// Extracts routing information from a message: which entity it targets
/// and (derived from that) which shard owns the entity.
pub trait MessageExtractor<M: Message>: Send + Sync + 'static {
    fn entity_id(&self, message: &M) -> String;

    fn shard_id(&self, message: &M, number_of_shards: u32) -> String {
        shard_id_for(&self.entity_id(message), number_of_shards)
    }
}

/// Durable record of which entities were active, so a region can restart
/// them after a shard moves to a new host. The in-memory default loses
/// this on process restart — acceptable for development, but real
/// deployments should back this with persistent storage.
#[async_trait]
pub trait RememberEntitiesStore: Send + Sync {
    async fn add_entity(&self, shard_id: &str, entity_id: &str);
    async fn remove_entity(&self, shard_id: &str, entity_id: &str);
    async fn entities_for_shard(&self, shard_id: &str) -> HashSet<String>;
}

#[derive(Default)]
pub struct InMemoryRememberEntitiesStore {
    shards: DashMap<String, HashSet<String>>,
}

#[async_trait]
impl RememberEntitiesStore for InMemoryRememberEntitiesStore {
    async fn add_entity(&self, shard_id: &str, entity_id: &str) {
        self.shards
            .entry(shard_id.to_string())
            .or_default()
            .insert(entity_id.to_string());
    }

    async fn remove_entity(&self, shard_id: &str, entity_id: &str) {
        if let Some(mut entities) = self.shards.get_mut(shard_id) {
            entities.remove(entity_id);
        }
    }

    async fn entities_for_shard(&self, shard_id: &str) -> HashSet<String> {
        self.shards
            .get(shard_id)
            .map(|e| e.clone())
            .unwrap_or_default()
    }
}

struct EntityEntry<M: Message> {
    actor_ref: ActorRef<M>,
    last_active: Instant,
}

/// One node's view of the shards it currently hosts, plus the entities
/// running within them.
///
/// `spawn_entity` is left as a caller-supplied closure rather than a
/// generic `Actor` bound, since spawning requires the running
/// `ActorSystem`/`ClusterSystem`, which `ShardRegion` itself does not own.
pub struct ShardRegion<M: Message, E: MessageExtractor<M>> {
    extractor: E,
    number_of_shards: u32,
    passivate_after: Duration,
    hosted_shards: DashMap<String, DashMap<String, Mutex<EntityEntry<M>>>>,
    remember_entities: Arc<dyn RememberEntitiesStore>,
}

impl<M: Message, E: MessageExtractor<M>> ShardRegion<M, E> {
    pub fn new(
        extractor: E,
        number_of_shards: u32,
        passivate_after: Duration,
        remember_entities: Arc<dyn RememberEntitiesStore>,
    ) -> Self {
        Self {
            extractor,
            number_of_shards,
            passivate_after,
            hosted_shards: DashMap::new(),
            remember_entities,
        }
    }

    pub fn shard_id_for(&self, message: &M) -> String {
        self.extractor.shard_id(message, self.number_of_shards)
    }

    pub fn entity_id_for(&self, message: &M) -> String {
        self.extractor.entity_id(message)
    }

    pub fn hosts_shard(&self, shard_id: &str) -> bool {
        self.hosted_shards.contains_key(shard_id)
    }

    /// Register this node as host for `shard_id`; idempotent.
    pub fn start_hosting(&self, shard_id: &str) {
        self.hosted_shards.entry(shard_id.to_string()).or_default();
    }

    /// Stop hosting `shard_id`, returning the entity ids that were active
    /// so the caller (the region's supervisor) can stop their actors.
    pub fn stop_hosting(&self, shard_id: &str) -> Vec<String> {
        match self.hosted_shards.remove(shard_id) {
            Some((_, entities)) => entities.iter().map(|e| e.key().clone()).collect(),
            None => Vec::new(),
        }
    }

    /// Find (or insert, via `spawn`) the entity ref for this message,
    /// marking it recently active for passivation purposes. `spawn` is
    /// only invoked on first access for a given entity.
    pub fn entity_ref(
        &self,
        message: &M,
        spawn: impl FnOnce(&str) -> ActorRef<M>,
    ) -> Option<ActorRef<M>> {
        let shard_id = self.shard_id_for(message);
        let entity_id = self.entity_id_for(message);
        let shard = self.hosted_shards.get(&shard_id)?;

        let entry = shard.entry(entity_id.clone()).or_insert_with(|| {
            let actor_ref = spawn(&entity_id);
            let remember = self.remember_entities.clone();
            let shard_id_owned = shard_id.clone();
            let entity_id_owned = entity_id.clone();
            tokio::spawn(async move {
                remember.add_entity(&shard_id_owned, &entity_id_owned).await;
            });
            Mutex::new(EntityEntry {
                actor_ref,
                last_active: Instant::now(),
            })
        });
        let mut guard = entry.lock();
        guard.last_active = Instant::now();
        Some(guard.actor_ref.clone())
    }

    /// Entities in any hosted shard idle longer than `passivate_after`;
    /// the caller is responsible for actually stopping them and then
    /// calling [`ShardRegion::passivate`].
    pub fn idle_entities(&self) -> Vec<(String, String)> {
        let now = Instant::now();
        let mut idle = Vec::new();
        for shard in self.hosted_shards.iter() {
            for entity in shard.value().iter() {
                if now.duration_since(entity.value().lock().last_active) >= self.passivate_after {
                    idle.push((shard.key().clone(), entity.key().clone()));
                }
            }
        }
        idle
    }

    pub fn passivate(&self, shard_id: &str, entity_id: &str) {
        if let Some(shard) = self.hosted_shards.get(shard_id) {
            shard.remove(entity_id);
        }
        let remember = self.remember_entities.clone();
        let shard_id = shard_id.to_string();
        let entity_id = entity_id.to_string();
        tokio::spawn(async move {
            remember.remove_entity(&shard_id, &entity_id).await;
        });
        debug!(shard_id, entity_id, "entity passivated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorId, LocalSender};
    use crate::mailbox::MailboxError;
    use crate::message::{MessageEnvelope, MessagePriority};
    use crate::util::ActorPath;

    #[derive(Debug, Clone)]
    struct Command {
        entity: String,
    }
    impl Message for Command {
        const MESSAGE_TYPE: &'static str = "shard_command";
        fn priority(&self) -> MessagePriority {
            MessagePriority::Normal
        }
    }

    struct ByEntityField;
    impl MessageExtractor<Command> for ByEntityField {
        fn entity_id(&self, message: &Command) -> String {
            message.entity.clone()
        }
    }

    struct NullSender;
    #[async_trait]
    impl LocalSender<Command> for NullSender {
        async fn send_local(&self, _envelope: MessageEnvelope<Command>) -> Result<(), MailboxError> {
            Ok(())
        }
    }

    fn region() -> ShardRegion<Command, ByEntityField> {
        ShardRegion::new(
            ByEntityField,
            10,
            Duration::from_secs(60),
            Arc::new(InMemoryRememberEntitiesStore::default()),
        )
    }

    #[tokio::test]
    async fn unhosted_shard_returns_no_entity() {
        let region = region();
        let msg = Command { entity: "acct-1".into() };
        assert!(region
            .entity_ref(&msg, |id| {
                let path = ActorPath::new(None, vec!["user".into(), id.to_string()]);
                ActorRef::local(ActorId::new(), path, NullSender)
            })
            .is_none());
    }

    #[tokio::test]
    async fn hosted_shard_spawns_once_and_reuses_the_ref() {
        let region = region();
        let msg = Command { entity: "acct-1".into() };
        let shard_id = region.shard_id_for(&msg);
        region.start_hosting(&shard_id);

        let mut spawn_count = 0;
        let first = region
            .entity_ref(&msg, |id| {
                spawn_count += 1;
                let path = ActorPath::new(None, vec!["user".into(), id.to_string()]);
                ActorRef::local(ActorId::new(), path, NullSender)
            })
            .unwrap();
        let second = region
            .entity_ref(&msg, |id| {
                spawn_count += 1;
                let path = ActorPath::new(None, vec!["user".into(), id.to_string()]);
                ActorRef::local(ActorId::new(), path, NullSender)
            })
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(spawn_count, 1);
    }

    #[tokio::test]
    async fn stop_hosting_returns_entities_that_were_active() {
        let region = region();
        let msg = Command { entity: "acct-1".into() };
        let shard_id = region.shard_id_for(&msg);
        region.start_hosting(&shard_id);
        region.entity_ref(&msg, |id| {
            let path = ActorPath::new(None, vec!["user".into(), id.to_string()]);
            ActorRef::local(ActorId::new(), path, NullSender)
        });

        let stopped = region.stop_hosting(&shard_id);
        assert_eq!(stopped, vec!["acct-1".to_string()]);
        assert!(!region.hosts_shard(&shard_id));
    }
}
