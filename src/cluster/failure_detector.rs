//! A hand-rolled phi-accrual failure detector, one instance per monitored
//! member.
//!
//! Modeled on the classic Hayashibara algorithm (as used by Akka/Pekko's
//! `PhiAccrualFailureDetector`): each heartbeat interval is recorded into a
//! sliding window; `phi(now)` estimates how suspicious the current silence
//! is against that window's mean/stddev, assuming roughly-normal inter-
//! arrival times.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::cluster::events::HeartbeatHistory;
use crate::util::NodeAddress;

/// Minimum standard deviation used in the phi calculation, preventing a
/// near-perfectly-regular heartbeat stream from producing an infinite phi
/// the instant one beat is late.
const MIN_STD_DEVIATION: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct FailureDetectorConfig {
    pub threshold: f64,
    pub max_sample_size: usize,
    pub min_std_deviation: Duration,
    pub acceptable_heartbeat_pause: Duration,
    pub heartbeat_interval: Duration,
}

impl Default for FailureDetectorConfig {
    fn default() -> Self {
        Self {
            threshold: 8.0,
            max_sample_size: 200,
            min_std_deviation: Duration::from_millis(100),
            acceptable_heartbeat_pause: Duration::from_secs(3),
            heartbeat_interval: Duration::from_secs(1),
        }
    }
}

struct MemberState {
    history: HeartbeatHistory,
    last_heartbeat: Option<DateTime<Utc>>,
}

/// Tracks phi per member, keyed by [`NodeAddress`]. Shared across the
/// gossip/heartbeat tasks via `Arc`, so interior state is lock-protected.
pub struct PhiAccrualFailureDetector {
    config: FailureDetectorConfig,
    members: DashMap<NodeAddress, Mutex<MemberState>>,
}

impl PhiAccrualFailureDetector {
    pub fn new(config: FailureDetectorConfig) -> Self {
        Self {
            config,
            members: DashMap::new(),
        }
    }

    /// Record a heartbeat received from `member` at `now`.
    pub fn heartbeat(&self, member: NodeAddress, now: DateTime<Utc>) {
        let entry = self.members.entry(member).or_insert_with(|| {
            Mutex::new(MemberState {
                history: HeartbeatHistory::new(self.config.max_sample_size),
                last_heartbeat: None,
            })
        });
        let mut state = entry.lock();
        if let Some(last) = state.last_heartbeat {
            if let Ok(interval) = (now - last).to_std() {
                state.history.record(interval);
            }
        }
        state.last_heartbeat = Some(now);
    }

    /// The phi value for `member` as of `now`; `None` if no heartbeat has
    /// ever been recorded (the member is simply unknown, not suspect).
    pub fn phi(&self, member: &NodeAddress, now: DateTime<Utc>) -> Option<f64> {
        let entry = self.members.get(member)?;
        let state = entry.lock();
        let last = state.last_heartbeat?;
        let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO).as_secs_f64();

        let mean = state
            .history
            .mean()
            .unwrap_or_else(|| self.config.heartbeat_interval.as_secs_f64());
        let adjusted_mean = mean + self.config.acceptable_heartbeat_pause.as_secs_f64();
        let std_dev = state
            .history
            .std_deviation()
            .unwrap_or(0.0)
            .max(self.config.min_std_deviation.as_secs_f64())
            .max(MIN_STD_DEVIATION);

        Some(phi_from_normal(elapsed, adjusted_mean, std_dev))
    }

    /// `true` once `phi` crosses the configured suspicion threshold.
    pub fn is_available(&self, member: &NodeAddress, now: DateTime<Utc>) -> bool {
        match self.phi(member, now) {
            Some(phi) => phi < self.config.threshold,
            None => true,
        }
    }

    pub fn remove(&self, member: &NodeAddress) {
        self.members.remove(member);
    }
}

/// `phi = -log10(1 - CDF(elapsed))` under a normal approximation of the
/// heartbeat interval distribution.
fn phi_from_normal(elapsed: f64, mean: f64, std_dev: f64) -> f64 {
    let y = (elapsed - mean) / std_dev;
    let e = (-y * (1.5976 + 0.070566 * y * y)).exp();
    let cdf = if y > 0.0 { e / (1.0 + e) } else { 1.0 - 1.0 / (1.0 + e) };
    let survival = (1.0 - cdf).max(f64::MIN_POSITIVE);
    -survival.log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    fn addr() -> NodeAddress {
        NodeAddress::new(
            "test",
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 2551),
            1,
        )
    }

    #[test]
    fn unknown_member_has_no_phi_but_is_considered_available() {
        let fd = PhiAccrualFailureDetector::new(FailureDetectorConfig::default());
        let now = Utc::now();
        assert!(fd.phi(&addr(), now).is_none());
        assert!(fd.is_available(&addr(), now));
    }

    #[test]
    fn phi_grows_with_elapsed_silence() {
        let fd = PhiAccrualFailureDetector::new(FailureDetectorConfig::default());
        let member = addr();
        let t0 = Utc::now();
        fd.heartbeat(member, t0);
        fd.heartbeat(member, t0 + chrono::Duration::seconds(1));
        fd.heartbeat(member, t0 + chrono::Duration::seconds(2));

        let phi_soon = fd.phi(&member, t0 + chrono::Duration::seconds(3)).unwrap();
        let phi_later = fd
            .phi(&member, t0 + chrono::Duration::seconds(30))
            .unwrap();
        assert!(phi_later > phi_soon);
    }

    #[test]
    fn crossing_threshold_marks_unavailable() {
        let config = FailureDetectorConfig {
            threshold: 8.0,
            acceptable_heartbeat_pause: Duration::from_millis(0),
            ..FailureDetectorConfig::default()
        };
        let fd = PhiAccrualFailureDetector::new(config);
        let member = addr();
        let t0 = Utc::now();
        fd.heartbeat(member, t0);
        fd.heartbeat(member, t0 + chrono::Duration::milliseconds(500));
        fd.heartbeat(member, t0 + chrono::Duration::milliseconds(1000));

        assert!(fd.is_available(&member, t0 + chrono::Duration::milliseconds(1500)));
        assert!(!fd.is_available(&member, t0 + chrono::Duration::seconds(60)));
    }
}
