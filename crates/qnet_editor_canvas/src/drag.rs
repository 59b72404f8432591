// SPDX-License-Identifier: MIT OR Apache-2.0
//! The pointer-gesture state machine that produces graph edges.
//!
//! Each active drag is an in-progress edge keyed by its anchor node:
//! anchored at the node's center with a provisional endpoint following
//! the pointer. On every update the far end is hit-tested against the
//! other placed nodes; landing inside a compatible candidate commits
//! the edge into the graph. Committed edges leave the in-progress set
//! immediately when the gesture ends, or after a short grace period so
//! releasing the pointer over the target does not start a new drag.

use crate::grace::{GraceQueue, DEFAULT_GRACE};
use crate::network::NetworkManager;
use crate::tracking::MoveTracker;
use crate::{node_center, node_rect};
use egui::Pos2;
use indexmap::IndexMap;
use qnet_editor_graph::{ConnectionId, Graph, GraphError, LinkRole, NodeId};
use std::time::{Duration, Instant};

/// A speculative edge tracking an active pointer drag
#[derive(Debug, Clone)]
pub struct InProgressEdge {
    /// Node the drag started from
    pub anchor: NodeId,
    /// Anchor center at drag start
    pub origin: Pos2,
    /// Provisional far end (follows the pointer until committed)
    pub endpoint: Pos2,
    /// Set once the edge has been committed into the graph
    pub committed: Option<ConnectionId>,
}

/// Outcome of a drag update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragUpdate {
    /// No uncommitted in-progress edge exists for this anchor
    Inactive,
    /// The far end is not over a valid target; the edge stays dangling
    Dangling,
    /// The edge was committed into the graph
    Committed(ConnectionId),
    /// The pair was already connected; the in-progress edge was
    /// silently discarded (routine outcome, not a failure)
    Discarded,
    /// Validation rejected the candidate; the edge stays dangling so
    /// the user can retarget. The error is surfaced to the UI layer.
    Rejected(GraphError),
}

/// Converts pointer gestures into committed graph connections
#[derive(Debug)]
pub struct ConnectionManager {
    in_progress: IndexMap<NodeId, InProgressEdge>,
    grace: GraceQueue,
    grace_delay: Duration,
}

impl ConnectionManager {
    /// Create a manager with the default grace period
    pub fn new() -> Self {
        Self::with_grace_delay(DEFAULT_GRACE)
    }

    /// Create a manager with an explicit grace period
    pub fn with_grace_delay(grace_delay: Duration) -> Self {
        Self {
            in_progress: IndexMap::new(),
            grace: GraceQueue::new(),
            grace_delay,
        }
    }

    /// Start (or resume) a drag anchored at `anchor`.
    ///
    /// Reuses the existing in-progress edge for the anchor if one is
    /// live. Containers cannot anchor a drag. Returns whether a drag is
    /// now active.
    pub fn begin_drag(&mut self, graph: &Graph, anchor: NodeId, pointer: Pos2) -> bool {
        let Some(node) = graph.node(anchor) else {
            return false;
        };
        if node.kind.link_role() == LinkRole::Container {
            return false;
        }
        let origin = node_center(node);
        self.in_progress.entry(anchor).or_insert_with(|| {
            tracing::debug!(anchor = %node.name, "drag started");
            InProgressEdge {
                anchor,
                origin,
                endpoint: pointer,
                committed: None,
            }
        });
        true
    }

    /// Move the provisional endpoint and attempt a commit when the far
    /// end lands inside a compatible candidate node.
    pub fn update_drag(
        &mut self,
        graph: &mut Graph,
        tracker: &mut MoveTracker,
        networks: &mut NetworkManager,
        anchor: NodeId,
        pointer: Pos2,
        now: Instant,
    ) -> DragUpdate {
        let Some(edge) = self.in_progress.get_mut(&anchor) else {
            return DragUpdate::Inactive;
        };
        if edge.committed.is_some() {
            return DragUpdate::Inactive;
        }
        edge.endpoint = pointer;

        let candidate = graph
            .nodes()
            .find(|n| {
                n.id != anchor
                    && n.kind.link_role() != LinkRole::Container
                    && node_rect(n).contains(pointer)
            })
            .map(|n| n.id);
        let Some(candidate) = candidate else {
            return DragUpdate::Dangling;
        };

        match graph.add_connection(anchor, candidate) {
            Ok(connection) => {
                let anchor_center = graph.node(anchor).map(node_center).unwrap_or(edge.origin);
                let target_center = graph.node(candidate).map(node_center).unwrap_or(pointer);
                edge.origin = anchor_center;
                edge.endpoint = target_center;
                edge.committed = Some(connection);
                tracker.subscribe(connection, anchor, anchor_center, candidate, target_center);
                networks.on_connection_created(graph, connection, anchor, candidate);
                // Keep the bookkeeping entry briefly so the pointer can
                // be released over the target without re-triggering.
                self.grace.schedule(anchor, now + self.grace_delay);
                DragUpdate::Committed(connection)
            }
            Err(GraphError::ConnectionAlreadyExists(_, _)) => {
                self.in_progress.shift_remove(&anchor);
                self.grace.cancel(anchor);
                DragUpdate::Discarded
            }
            Err(err) => {
                tracing::debug!(%err, "commit rejected; edge left for retargeting");
                DragUpdate::Rejected(err)
            }
        }
    }

    /// The gesture explicitly ended: drop the in-progress record for
    /// `anchor` right away, committed or not.
    pub fn end_drag(&mut self, anchor: NodeId) -> Option<InProgressEdge> {
        self.grace.cancel(anchor);
        self.in_progress.shift_remove(&anchor)
    }

    /// Discard an uncommitted in-progress edge. Committed edges are
    /// never cancelled this way.
    pub fn cancel_drag(&mut self, anchor: NodeId) -> bool {
        match self.in_progress.get(&anchor) {
            Some(edge) if edge.committed.is_none() => {
                self.in_progress.shift_remove(&anchor);
                true
            }
            _ => false,
        }
    }

    /// Re-anchor tracked geometry after a node moved
    pub fn endpoint_moved(&mut self, graph: &Graph, tracker: &mut MoveTracker, node: NodeId) {
        if let Some(moved) = graph.node(node) {
            tracker.node_moved(node, node_center(moved));
        }
    }

    /// Cleanup after a node was deleted: drop any in-progress edge it
    /// anchored and cancel its pending grace clear.
    pub fn node_deleted(&mut self, node: NodeId) {
        self.in_progress.shift_remove(&node);
        self.grace.cancel(node);
    }

    /// Drop committed in-progress records whose grace period expired.
    /// Driven by the host event loop.
    pub fn flush(&mut self, now: Instant) {
        for anchor in self.grace.drain_expired(now) {
            if self
                .in_progress
                .get(&anchor)
                .is_some_and(|edge| edge.committed.is_some())
            {
                self.in_progress.shift_remove(&anchor);
            }
        }
    }

    /// In-progress edge anchored at `anchor`, if any
    pub fn edge(&self, anchor: NodeId) -> Option<&InProgressEdge> {
        self.in_progress.get(&anchor)
    }

    /// All in-progress edges (for the render surface)
    pub fn edges(&self) -> impl Iterator<Item = &InProgressEdge> {
        self.in_progress.values()
    }

    /// Number of in-progress edges
    pub fn in_progress_count(&self) -> usize {
        self.in_progress.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
