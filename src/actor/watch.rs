//! Actor termination watching.
//!
//! Any actor can register interest in another's lifecycle via
//! [`ActorContext::watch`](super::context::ActorContext::watch); when the
//! watched actor stops, every watcher is enqueued a `Signal::Terminated`
//! (see [`super::signal`]) instead of being left to guess via a timeout.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::util::ActorAddress;

/// Why a watched actor terminated, passed along in the `Terminated` signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    Normal,
    Failed { message: String },
    Killed,
}

type TerminationCallback = Box<dyn Fn(&ActorAddress, TerminationReason) + Send + Sync>;

/// Shared, cloneable handle onto one actor system's watch registry.
///
/// Registration is keyed by the watched address; delivery is a direct
/// callback invocation rather than a generic message send, because
/// `Terminated` must reach watchers regardless of what message type `M`
/// they handle — this is the framework-signal channel, not the user
/// mailbox.
#[derive(Clone)]
pub struct WatchHandle {
    watchers: Arc<DashMap<ActorAddress, Vec<(ActorAddress, TerminationCallback)>>>,
}

impl WatchHandle {
    pub fn new() -> Self {
        Self {
            watchers: Arc::new(DashMap::new()),
        }
    }

    /// `watcher` wants to be told when `target` stops.
    pub fn watch(&self, watcher: ActorAddress, target: ActorAddress) {
        self.register(watcher, target, Box::new(|_, _| {}));
    }

    /// Same as [`Self::watch`] but with an explicit delivery callback —
    /// used by the system runner to enqueue a `Signal::Terminated` onto the
    /// watcher's own signal channel.
    pub fn register(
        &self,
        watcher: ActorAddress,
        target: ActorAddress,
        on_terminated: TerminationCallback,
    ) {
        self.watchers
            .entry(target)
            .or_default()
            .push((watcher, on_terminated));
    }

    pub fn unwatch(&self, watcher: &ActorAddress, target: &ActorAddress) {
        if let Some(mut entries) = self.watchers.get_mut(target) {
            entries.retain(|(w, _)| w != watcher);
        }
    }

    /// Notify all watchers of `target`'s termination and drop the entry.
    pub fn notify_terminated(&self, target: &ActorAddress, reason: TerminationReason) {
        if let Some((_, entries)) = self.watchers.remove(target) {
            for (_watcher, callback) in entries {
                callback(target, reason.clone());
            }
        }
    }

    pub fn watcher_count(&self, target: &ActorAddress) -> usize {
        self.watchers.get(target).map(|e| e.len()).unwrap_or(0)
    }
}

impl Default for WatchHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue of pending `Terminated` notifications for one actor, drained by
/// the system runner between message-handling frames.
#[derive(Clone, Default)]
pub struct SignalQueue {
    pending: Arc<Mutex<Vec<(ActorAddress, TerminationReason)>>>,
}

impl SignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, target: ActorAddress, reason: TerminationReason) {
        self.pending.lock().push((target, reason));
    }

    pub fn drain(&self) -> Vec<(ActorAddress, TerminationReason)> {
        std::mem::take(&mut *self.pending.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watcher_is_notified_exactly_once() {
        let handle = WatchHandle::new();
        let queue = SignalQueue::new();
        let watcher = ActorAddress::named("watcher");
        let target = ActorAddress::named("target");

        let queue_clone = queue.clone();
        handle.register(
            watcher.clone(),
            target.clone(),
            Box::new(move |addr, reason| queue_clone.push(addr.clone(), reason)),
        );
        assert_eq!(handle.watcher_count(&target), 1);

        handle.notify_terminated(&target, TerminationReason::Normal);
        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].0, target);

        // Entry is consumed by notification; a second notify is a no-op.
        handle.notify_terminated(&target, TerminationReason::Normal);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn unwatch_removes_only_that_watcher() {
        let handle = WatchHandle::new();
        let target = ActorAddress::named("target");
        let w1 = ActorAddress::named("w1");
        let w2 = ActorAddress::named("w2");
        handle.watch(w1.clone(), target.clone());
        handle.watch(w2.clone(), target.clone());
        assert_eq!(handle.watcher_count(&target), 2);

        handle.unwatch(&w1, &target);
        assert_eq!(handle.watcher_count(&target), 1);
    }
}
