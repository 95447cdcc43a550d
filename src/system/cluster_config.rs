//! Cluster-level configuration, in the same fluent-builder-plus-`validate`
//! style as [`super::config::SystemConfig`].

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::cluster::SplitBrainStrategy;
use crate::util::NodeAddress;

/// Wire-protocol (artery) tuning: frame size ceiling and connection
/// timeouts, layered on top of `message::codec`'s fixed wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArteryConfig {
    pub bind_addr: std::net::SocketAddr,
    pub connect_timeout: Duration,
    pub tls_enabled: bool,
}

impl ArteryConfig {
    pub fn builder(bind_addr: std::net::SocketAddr) -> ArteryConfigBuilder {
        ArteryConfigBuilder {
            config: Self {
                bind_addr,
                connect_timeout: Duration::from_secs(5),
                tls_enabled: true,
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout.is_zero() {
            return Err("artery connect_timeout must be > 0".into());
        }
        Ok(())
    }
}

pub struct ArteryConfigBuilder {
    config: ArteryConfig,
}

impl ArteryConfigBuilder {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_tls(mut self, enabled: bool) -> Self {
        self.config.tls_enabled = enabled;
        self
    }

    pub fn build(self) -> Result<ArteryConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Top-level cluster configuration: identity, seed nodes, gossip/failure
/// detector cadence and the configured split-brain strategy.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    pub system_name: &'static str,
    pub seed_nodes: Vec<NodeAddress>,
    pub gossip_interval: Duration,
    pub heartbeat_interval: Duration,
    pub sbr_strategy: SplitBrainStrategy,
    pub roles: Vec<String>,
}

impl ClusterConfig {
    pub fn builder(system_name: &'static str) -> ClusterConfigBuilder {
        ClusterConfigBuilder {
            config: Self {
                system_name,
                seed_nodes: Vec::new(),
                gossip_interval: Duration::from_secs(1),
                heartbeat_interval: Duration::from_secs(1),
                sbr_strategy: SplitBrainStrategy::KeepMajority,
                roles: Vec::new(),
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.system_name.is_empty() {
            return Err("cluster system_name must not be empty".into());
        }
        if self.gossip_interval.is_zero() {
            return Err("gossip_interval must be > 0".into());
        }
        if self.heartbeat_interval.is_zero() {
            return Err("heartbeat_interval must be > 0".into());
        }
        Ok(())
    }
}

pub struct ClusterConfigBuilder {
    config: ClusterConfig,
}

impl ClusterConfigBuilder {
    pub fn with_seed_nodes(mut self, seeds: Vec<NodeAddress>) -> Self {
        self.config.seed_nodes = seeds;
        self
    }

    pub fn with_gossip_interval(mut self, interval: Duration) -> Self {
        self.config.gossip_interval = interval;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.config.heartbeat_interval = interval;
        self
    }

    pub fn with_sbr_strategy(mut self, strategy: SplitBrainStrategy) -> Self {
        self.config.sbr_strategy = strategy;
        self
    }

    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.config.roles = roles;
        self
    }

    pub fn build(self) -> Result<ClusterConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Per-entity-type sharding configuration.
#[derive(Debug, Clone)]
pub struct ShardingConfig {
    pub type_name: String,
    pub number_of_shards: u32,
    pub passivate_after: Duration,
    pub remember_entities: bool,
}

impl ShardingConfig {
    pub fn builder(type_name: impl Into<String>) -> ShardingConfigBuilder {
        ShardingConfigBuilder {
            config: Self {
                type_name: type_name.into(),
                number_of_shards: 100,
                passivate_after: Duration::from_secs(120),
                remember_entities: false,
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.type_name.is_empty() {
            return Err("sharding type_name must not be empty".into());
        }
        if self.number_of_shards == 0 {
            return Err("number_of_shards must be > 0".into());
        }
        Ok(())
    }
}

pub struct ShardingConfigBuilder {
    config: ShardingConfig,
}

impl ShardingConfigBuilder {
    pub fn with_number_of_shards(mut self, n: u32) -> Self {
        self.config.number_of_shards = n;
        self
    }

    pub fn with_passivate_after(mut self, duration: Duration) -> Self {
        self.config.passivate_after = duration;
        self
    }

    pub fn with_remember_entities(mut self, enabled: bool) -> Self {
        self.config.remember_entities = enabled;
        self
    }

    pub fn build(self) -> Result<ShardingConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Split-brain resolver activation config: the strategy itself lives in
/// [`crate::cluster::SplitBrainStrategy`]; this wraps it with the
/// stable-after delay real deployments use to avoid reacting to a
/// transient blip.
#[derive(Debug, Clone)]
pub struct SplitBrainResolverConfig {
    pub strategy: SplitBrainStrategy,
    pub stable_after: Duration,
}

impl SplitBrainResolverConfig {
    pub fn builder(strategy: SplitBrainStrategy) -> SplitBrainResolverConfigBuilder {
        SplitBrainResolverConfigBuilder {
            config: SplitBrainResolverConfig {
                strategy,
                stable_after: Duration::from_secs(7),
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.stable_after.is_zero() {
            return Err("stable_after must be > 0".into());
        }
        Ok(())
    }
}

pub struct SplitBrainResolverConfigBuilder {
    config: SplitBrainResolverConfig,
}

impl SplitBrainResolverConfigBuilder {
    pub fn with_stable_after(mut self, duration: Duration) -> Self {
        self.config.stable_after = duration;
        self
    }

    pub fn build(self) -> Result<SplitBrainResolverConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Receptionist tuning: currently just how long a registration survives
/// without a gossip refresh before being dropped as stale.
#[derive(Debug, Clone, Copy)]
pub struct ReceptionistConfig {
    pub registration_ttl: Duration,
}

impl Default for ReceptionistConfig {
    fn default() -> Self {
        Self {
            registration_ttl: Duration::from_secs(30),
        }
    }
}

impl ReceptionistConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.registration_ttl.is_zero() {
            return Err("registration_ttl must be > 0".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_config_rejects_empty_name() {
        assert!(ClusterConfig::builder("").build().is_err());
    }

    #[test]
    fn sharding_config_defaults_to_100_shards() {
        let config = ShardingConfig::builder("account").build().unwrap();
        assert_eq!(config.number_of_shards, 100);
    }

    #[test]
    fn sharding_config_rejects_zero_shards() {
        let result = ShardingConfig::builder("account")
            .with_number_of_shards(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn sbr_config_carries_the_chosen_strategy() {
        let config = SplitBrainResolverConfig::builder(SplitBrainStrategy::KeepOldest)
            .build()
            .unwrap();
        assert_eq!(config.strategy, SplitBrainStrategy::KeepOldest);
    }
}
