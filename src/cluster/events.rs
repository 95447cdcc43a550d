//! Cluster domain events, published onto the same monitoring bus that
//! actor/supervisor/mailbox events already use.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::cluster::member::MemberStatus;
use crate::util::NodeAddress;

/// The seven externally-visible cluster lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClusterEvent {
    MemberJoined {
        member: NodeAddress,
        at: DateTime<Utc>,
    },
    MemberUp {
        member: NodeAddress,
        at: DateTime<Utc>,
    },
    MemberStatusChanged {
        member: NodeAddress,
        status: MemberStatus,
        at: DateTime<Utc>,
    },
    MemberRemoved {
        member: NodeAddress,
        previous_status: MemberStatus,
        at: DateTime<Utc>,
    },
    UnreachableMember {
        member: NodeAddress,
        at: DateTime<Utc>,
    },
    ReachableMember {
        member: NodeAddress,
        at: DateTime<Utc>,
    },
    LeaderChanged {
        leader: Option<NodeAddress>,
        at: DateTime<Utc>,
    },
}

impl ClusterEvent {
    pub fn subject(&self) -> Option<NodeAddress> {
        match self {
            Self::MemberJoined { member, .. }
            | Self::MemberUp { member, .. }
            | Self::MemberStatusChanged { member, .. }
            | Self::MemberRemoved { member, .. }
            | Self::UnreachableMember { member, .. }
            | Self::ReachableMember { member, .. } => Some(*member),
            Self::LeaderChanged { leader, .. } => *leader,
        }
    }
}

/// Phi-accrual failure detector sample history for one monitored member.
#[derive(Debug, Clone)]
pub struct HeartbeatHistory {
    intervals: Vec<Duration>,
    max_samples: usize,
}

impl HeartbeatHistory {
    pub fn new(max_samples: usize) -> Self {
        Self {
            intervals: Vec::with_capacity(max_samples),
            max_samples,
        }
    }

    pub fn record(&mut self, interval: Duration) {
        if self.intervals.len() == self.max_samples {
            self.intervals.remove(0);
        }
        self.intervals.push(interval);
    }

    pub fn mean(&self) -> Option<f64> {
        if self.intervals.is_empty() {
            return None;
        }
        let total: f64 = self.intervals.iter().map(Duration::as_secs_f64).sum();
        Some(total / self.intervals.len() as f64)
    }

    pub fn std_deviation(&self) -> Option<f64> {
        let mean = self.mean()?;
        if self.intervals.len() < 2 {
            return Some(0.0);
        }
        let variance = self
            .intervals
            .iter()
            .map(|d| (d.as_secs_f64() - mean).powi(2))
            .sum::<f64>()
            / self.intervals.len() as f64;
        Some(variance.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_evicts_oldest_sample_past_capacity() {
        let mut h = HeartbeatHistory::new(2);
        h.record(Duration::from_millis(100));
        h.record(Duration::from_millis(200));
        h.record(Duration::from_millis(300));
        assert_eq!(h.intervals.len(), 2);
        assert_eq!(h.intervals[0], Duration::from_millis(200));
    }

    #[test]
    fn empty_history_has_no_mean() {
        let h = HeartbeatHistory::new(4);
        assert!(h.mean().is_none());
    }
}
