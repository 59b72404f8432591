// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deterministic replacement for fire-and-forget clear timers.
//!
//! A freshly committed in-progress edge is kept around for a short
//! grace period so releasing the pointer over the target does not start
//! a new drag. Each pending clear is keyed by the anchor node and can
//! be cancelled when that node is deleted, so the queue never acts on
//! stale state.

use indexmap::IndexMap;
use qnet_editor_graph::NodeId;
use std::time::{Duration, Instant};

/// Default grace period before a committed in-progress record is dropped
pub const DEFAULT_GRACE: Duration = Duration::from_millis(300);

/// Pending in-progress clears, keyed by anchor node
#[derive(Debug, Default)]
pub struct GraceQueue {
    pending: IndexMap<NodeId, Instant>,
}

impl GraceQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule (or reschedule) a clear for `anchor` at `deadline`
    pub fn schedule(&mut self, anchor: NodeId, deadline: Instant) {
        self.pending.insert(anchor, deadline);
    }

    /// Cancel a pending clear. Returns whether one was pending.
    pub fn cancel(&mut self, anchor: NodeId) -> bool {
        self.pending.shift_remove(&anchor).is_some()
    }

    /// Remove and return all anchors whose deadline has passed
    pub fn drain_expired(&mut self, now: Instant) -> Vec<NodeId> {
        let expired: Vec<NodeId> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(anchor, _)| *anchor)
            .collect();
        for anchor in &expired {
            self.pending.shift_remove(anchor);
        }
        expired
    }

    /// Whether a clear is pending for `anchor`
    pub fn is_pending(&self, anchor: NodeId) -> bool {
        self.pending.contains_key(&anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_only_expired() {
        let mut queue = GraceQueue::new();
        let now = Instant::now();
        let a = NodeId::new();
        let b = NodeId::new();
        queue.schedule(a, now);
        queue.schedule(b, now + Duration::from_secs(10));

        let expired = queue.drain_expired(now);
        assert_eq!(expired, vec![a]);
        assert!(queue.is_pending(b));
    }

    #[test]
    fn test_cancel_is_deterministic() {
        let mut queue = GraceQueue::new();
        let a = NodeId::new();
        queue.schedule(a, Instant::now());
        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert!(queue.drain_expired(Instant::now() + Duration::from_secs(1)).is_empty());
    }
}
