// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-canvas editing session.
//!
//! One [`EditorSession`] exists per active editing surface and is
//! passed by reference to whatever needs it; it owns the graph and the
//! managers and keeps them synchronized, so no component ever reaches
//! into another's internal collections.

use crate::drag::{ConnectionManager, DragUpdate, InProgressEdge};
use crate::network::{ConnectionEvent, NetworkManager, NetworkId, SubscriberId};
use crate::tracking::MoveTracker;
use crate::node_center;
use egui::Pos2;
use qnet_editor_graph::{ConnectionId, Graph, GraphError, NodeId, NodeKind};
use std::time::Instant;

/// The editing context for one canvas
pub struct EditorSession {
    graph: Graph,
    connections: ConnectionManager,
    networks: NetworkManager,
    tracker: MoveTracker,
}

impl EditorSession {
    /// Create a session over an empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_graph(Graph::new(name))
    }

    /// Create a session over an existing graph (e.g. a completed
    /// import) and seed edge tracking from its committed connections.
    pub fn with_graph(graph: Graph) -> Self {
        let mut session = Self {
            graph: Graph::new(""),
            connections: ConnectionManager::new(),
            networks: NetworkManager::new(),
            tracker: MoveTracker::new(),
        };
        session.replace_graph(graph);
        session
    }

    /// The live graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Replace the live graph wholesale (all-or-nothing import swap).
    ///
    /// Membership, edge tracking, and in-progress gestures are rebuilt
    /// for the new graph; registered observers survive the swap and
    /// see a `Created` event per seeded connection.
    pub fn replace_graph(&mut self, graph: Graph) {
        self.connections = ConnectionManager::new();
        self.tracker = MoveTracker::new();
        self.networks.reset_membership();
        self.graph = graph;
        for conn in self.graph.connections() {
            if let (Some(from), Some(to)) =
                (self.graph.node(conn.from), self.graph.node(conn.to))
            {
                self.tracker
                    .subscribe(conn.id, from.id, node_center(from), to.id, node_center(to));
                self.networks
                    .on_connection_created(&self.graph, conn.id, from.id, to.id);
            }
        }
    }

    /// Tracked committed-edge geometry
    pub fn tracker(&self) -> &MoveTracker {
        &self.tracker
    }

    /// In-progress edges for the render surface
    pub fn in_progress(&self) -> impl Iterator<Item = &InProgressEdge> {
        self.connections.edges()
    }

    /// Place a node with a default name
    pub fn add_node(&mut self, kind: NodeKind, position: [f32; 2]) -> NodeId {
        self.graph.add_node(kind, position)
    }

    /// Place a node under an explicit name
    pub fn add_node_named(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
        position: [f32; 2],
    ) -> Result<NodeId, GraphError> {
        self.graph.add_node_named(name, kind, position)
    }

    /// Rename a node; rejected without mutation if the name is taken
    pub fn rename_node(&mut self, node: NodeId, new_name: &str) -> Result<(), GraphError> {
        self.graph.rename_node(node, new_name)
    }

    /// Move a node and propagate the new center to tracked edges and
    /// observers. Compatibility is not revalidated.
    pub fn move_node(&mut self, node: NodeId, position: [f32; 2]) -> Result<(), GraphError> {
        self.graph.move_node(node, position)?;
        self.connections
            .endpoint_moved(&self.graph, &mut self.tracker, node);
        self.networks.on_node_moved(node);
        Ok(())
    }

    /// Delete a node, cascading to incident connections, tracking
    /// subscriptions, pending grace clears, and observer notifications.
    pub fn delete_node(&mut self, node: NodeId) -> bool {
        let Some((_, removed)) = self.graph.remove_node(node) else {
            return false;
        };
        self.connections.node_deleted(node);
        for conn in removed {
            self.tracker.unsubscribe_connection(conn.id);
            self.networks
                .on_connection_removed(conn.id, conn.from, conn.to);
        }
        true
    }

    /// Start a connection drag from `anchor`
    pub fn begin_drag(&mut self, anchor: NodeId, pointer: Pos2) -> bool {
        self.connections.begin_drag(&self.graph, anchor, pointer)
    }

    /// Advance a connection drag to the current pointer position
    pub fn update_drag(&mut self, anchor: NodeId, pointer: Pos2) -> DragUpdate {
        self.connections.update_drag(
            &mut self.graph,
            &mut self.tracker,
            &mut self.networks,
            anchor,
            pointer,
            Instant::now(),
        )
    }

    /// End the gesture for `anchor`, dropping its in-progress record
    pub fn end_drag(&mut self, anchor: NodeId) {
        self.connections.end_drag(anchor);
    }

    /// Cancel an uncommitted drag; a no-op on the committed graph
    pub fn cancel_drag(&mut self, anchor: NodeId) -> bool {
        self.connections.cancel_drag(anchor)
    }

    /// Remove a committed connection and notify observers
    pub fn remove_connection(&mut self, connection: ConnectionId) -> bool {
        let Some(conn) = self.graph.remove_connection(connection) else {
            return false;
        };
        self.tracker.unsubscribe_connection(connection);
        self.networks
            .on_connection_removed(conn.id, conn.from, conn.to);
        true
    }

    /// Flush expired grace-period bookkeeping; call from the host loop
    pub fn tick(&mut self, now: Instant) {
        self.connections.flush(now);
    }

    /// Register a structural-change observer
    pub fn subscribe(&mut self, callback: impl FnMut(&ConnectionEvent) + 'static) -> SubscriberId {
        self.networks.subscribe(callback)
    }

    /// Remove a structural-change observer
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.networks.unsubscribe(id)
    }

    /// Logical classical network of a node
    pub fn network_of(&self, node: NodeId) -> NetworkId {
        self.networks.network_of(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_full_drag_gesture_through_session() {
        let mut session = EditorSession::new("lab");
        let ch1 = session.add_node(NodeKind::ClassicalHost, [0.0, 0.0]);
        let ch2 = session.add_node(NodeKind::ClassicalHost, [300.0, 0.0]);

        assert!(session.begin_drag(ch1, pos2(32.0, 32.0)));
        assert_eq!(session.update_drag(ch1, pos2(150.0, 32.0)), DragUpdate::Dangling);
        let DragUpdate::Committed(conn) = session.update_drag(ch1, pos2(332.0, 32.0)) else {
            panic!("expected commit");
        };
        session.end_drag(ch1);

        assert_eq!(session.graph().connection_count(), 1);
        assert_eq!(session.in_progress().count(), 0);
        assert_eq!(session.network_of(ch1), session.network_of(ch2));

        // Moving an endpoint afterwards updates geometry, not identity.
        let before = session.graph().connection(conn).unwrap().clone();
        session.move_node(ch2, [300.0, 400.0]).unwrap();
        let after = session.graph().connection(conn).unwrap();
        assert_eq!(after.id, before.id);
        assert!((after.loss_per_km - before.loss_per_km).abs() < f32::EPSILON);
        assert_eq!(session.tracker().segment(conn).unwrap().1, pos2(332.0, 432.0));
    }

    #[test]
    fn test_delete_notifies_and_untracks() {
        let mut session = EditorSession::new("lab");
        let h1 = session.add_node(NodeKind::ClassicalHost, [0.0, 0.0]);
        let r1 = session.add_node(NodeKind::ClassicalRouter, [300.0, 0.0]);
        let h2 = session.add_node(NodeKind::ClassicalHost, [600.0, 0.0]);

        session.begin_drag(h1, pos2(32.0, 32.0));
        session.update_drag(h1, pos2(332.0, 32.0));
        session.end_drag(h1);
        session.begin_drag(h2, pos2(632.0, 32.0));
        session.update_drag(h2, pos2(332.0, 32.0));
        session.end_drag(h2);
        assert_eq!(session.graph().connection_count(), 2);

        let removals = Rc::new(RefCell::new(0));
        let sink = removals.clone();
        session.subscribe(move |event| {
            if matches!(event, ConnectionEvent::Removed { .. }) {
                *sink.borrow_mut() += 1;
            }
        });

        assert!(session.delete_node(r1));
        assert_eq!(session.graph().connection_count(), 0);
        assert_eq!(session.graph().node_count(), 2);
        assert_eq!(session.tracker().len(), 0);
        assert_eq!(*removals.borrow(), 2);
    }

    #[test]
    fn test_subscribers_survive_graph_replacement() {
        let mut session = EditorSession::new("lab");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        session.subscribe(move |event| sink.borrow_mut().push(*event));

        let mut imported = Graph::new("imported");
        let a = imported.add_node(NodeKind::ClassicalHost, [0.0, 0.0]);
        let b = imported.add_node(NodeKind::ClassicalHost, [300.0, 0.0]);
        imported.add_connection(a, b).unwrap();
        session.replace_graph(imported);

        // Seeding announces the imported connection to the observer.
        assert!(matches!(seen.borrow()[0], ConnectionEvent::Created { .. }));
        assert_eq!(session.network_of(a), session.network_of(b));

        session.move_node(a, [0.0, 100.0]).unwrap();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[1], ConnectionEvent::NodeMoved { .. }));
    }

    #[test]
    fn test_adapter_pairing_scenario() {
        let mut session = EditorSession::new("lab");
        let qa = session.add_node_named("QA1", NodeKind::QuantumAdapter, [300.0, 300.0]).unwrap();
        let qh = session.add_node_named("QH1", NodeKind::QuantumHost, [0.0, 300.0]).unwrap();
        let ch = session.add_node_named("CH1", NodeKind::ClassicalHost, [600.0, 300.0]).unwrap();

        session.begin_drag(qa, pos2(332.0, 332.0));
        assert!(matches!(session.update_drag(qa, pos2(32.0, 332.0)), DragUpdate::Committed(_)));
        session.end_drag(qa);
        session.begin_drag(qa, pos2(332.0, 332.0));
        assert!(matches!(session.update_drag(qa, pos2(632.0, 332.0)), DragUpdate::Committed(_)));
        session.end_drag(qa);

        let graph = session.graph();
        assert_eq!(
            graph.adapter_peer(qa, qnet_editor_graph::Family::Quantum).map(|n| n.id),
            Some(qh)
        );
        assert_eq!(
            graph.adapter_peer(qa, qnet_editor_graph::Family::Classical).map(|n| n.id),
            Some(ch)
        );
    }
}
