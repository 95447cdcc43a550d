//! Entity sharding: consistently routes messages for a keyed entity to
//! exactly one actor instance, rebalancing entities across the cluster as
//! membership changes.

pub mod coordinator;
pub mod region;

pub use coordinator::{ShardCoordinator, ShardingError};
pub use region::{MessageExtractor, RememberEntitiesStore, ShardRegion};

// Layer 1: Standard library imports
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Derive a shard id from an entity id's hash, matching the teacher's
/// `dashmap`-style hash-bucket partitioning rather than a custom ring.
pub fn shard_id_for(entity_id: &str, number_of_shards: u32) -> String {
    let mut hasher = DefaultHasher::new();
    entity_id.hash(&mut hasher);
    let bucket = (hasher.finish() % number_of_shards as u64) as u32;
    bucket.to_string()
}
