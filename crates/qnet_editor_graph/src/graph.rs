// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.

use crate::connection::{pair_key, Connection, ConnectionId};
use crate::node::{Family, Node, NodeId, NodeKind};
use crate::registry::NodeRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Error raised by graph mutation primitives.
///
/// Every variant leaves the graph unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Both endpoints of the requested connection are the same node
    #[error("a node cannot be connected to itself")]
    SelfConnection,

    /// A connection for this unordered node pair already exists
    #[error("connection between {0} and {1} already exists")]
    ConnectionAlreadyExists(String, String),

    /// The two kinds may not be linked directly
    #[error("{from:?} cannot be connected to {to:?}")]
    IncompatibleConnection {
        /// Kind of the originating endpoint
        from: NodeKind,
        /// Kind of the target endpoint
        to: NodeKind,
    },

    /// The adapter already has a bound peer on that family side
    #[error("adapter {adapter} already has a {family:?}-side peer")]
    AdapterSideOccupied {
        /// Name of the adapter node
        adapter: String,
        /// Family side that is already bound
        family: Family,
    },

    /// The requested name is held by another node
    #[error("node name {0:?} is already in use")]
    DuplicateNodeName(String),

    /// Referenced node does not exist
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
}

/// The topology graph: placed nodes plus committed connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name (becomes the topology document name on export)
    pub name: String,
    nodes: IndexMap<NodeId, Node>,
    connections: IndexMap<ConnectionId, Connection>,
    registry: NodeRegistry,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
            registry: NodeRegistry::new(),
        }
    }

    /// Place a node with a registry-assigned default name
    pub fn add_node(&mut self, kind: NodeKind, position: [f32; 2]) -> NodeId {
        let name = self.registry.default_name(kind);
        let node = Node::new(name, kind).with_position(position[0], position[1]);
        let id = node.id;
        self.registry.claim(&node.name, id);
        tracing::debug!(name = %node.name, kind = ?kind, "node placed");
        self.nodes.insert(id, node);
        id
    }

    /// Place a node under an explicit name
    pub fn add_node_named(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
        position: [f32; 2],
    ) -> Result<NodeId, GraphError> {
        let name = name.into();
        if self.registry.contains(&name) {
            return Err(GraphError::DuplicateNodeName(name));
        }
        let node = Node::new(name, kind).with_position(position[0], position[1]);
        let id = node.id;
        self.registry.claim(&node.name, id);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Remove a node, cascading to its incident connections.
    ///
    /// Returns the node together with the removed connections so the
    /// caller can release tracking subscriptions and notify observers.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<(Node, Vec<Connection>)> {
        let node = self.nodes.shift_remove(&node_id)?;
        self.registry.release(&node.name);
        let mut removed = Vec::new();
        self.connections.retain(|_, c| {
            if c.involves(node_id) {
                removed.push(c.clone());
                false
            } else {
                true
            }
        });
        tracing::debug!(name = %node.name, cascaded = removed.len(), "node removed");
        Some((node, removed))
    }

    /// Rename a node. Fails with [`GraphError::DuplicateNodeName`] if
    /// the name is held by another node; the graph is unchanged then.
    pub fn rename_node(&mut self, node_id: NodeId, new_name: &str) -> Result<(), GraphError> {
        let old = self
            .nodes
            .get(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?
            .name
            .clone();
        if !self.registry.reclaim(&old, new_name, node_id) {
            return Err(GraphError::DuplicateNodeName(new_name.to_owned()));
        }
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.name = new_name.to_owned();
        }
        Ok(())
    }

    /// Move a node's top-left corner
    pub fn move_node(&mut self, node_id: NodeId, position: [f32; 2]) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        node.position = position;
        Ok(())
    }

    /// Resize a node's bounding box
    pub fn resize_node(&mut self, node_id: NodeId, size: [f32; 2]) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        node.size = size;
        Ok(())
    }

    /// Override the fiber loss of a committed connection
    pub fn set_loss_per_km(&mut self, connection_id: ConnectionId, loss_per_km: f32) -> bool {
        match self.connections.get_mut(&connection_id) {
            Some(conn) => {
                conn.loss_per_km = loss_per_km;
                true
            }
            None => false,
        }
    }

    /// Commit a connection between two placed nodes.
    ///
    /// Validation order: endpoints exist, no self-loop, kinds are
    /// link-compatible, the unordered pair is not already connected,
    /// and an adapter endpoint has a free slot on the relevant family
    /// side. Any failure leaves the graph unchanged.
    pub fn add_connection(
        &mut self,
        from: NodeId,
        to: NodeId,
    ) -> Result<ConnectionId, GraphError> {
        let from_node = self.nodes.get(&from).ok_or(GraphError::NodeNotFound(from))?;
        let to_node = self.nodes.get(&to).ok_or(GraphError::NodeNotFound(to))?;

        if from == to {
            return Err(GraphError::SelfConnection);
        }
        if !from_node.kind.can_link_to(to_node.kind) {
            return Err(GraphError::IncompatibleConnection {
                from: from_node.kind,
                to: to_node.kind,
            });
        }
        if self.has_pair(&from_node.name, &to_node.name) {
            return Err(GraphError::ConnectionAlreadyExists(
                from_node.name.clone(),
                to_node.name.clone(),
            ));
        }
        // One bound peer per adapter side, on either end of the link.
        for (adapter, peer) in [(from_node, to_node), (to_node, from_node)] {
            if adapter.kind == NodeKind::QuantumAdapter
                && self.adapter_peer(adapter.id, peer.family()).is_some()
            {
                return Err(GraphError::AdapterSideOccupied {
                    adapter: adapter.name.clone(),
                    family: peer.family(),
                });
            }
        }

        let connection = Connection::new(from, to, from_node.kind.family());
        let id = connection.id;
        tracing::debug!(from = %from_node.name, to = %to_node.name, "connection committed");
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Remove a connection
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Whether the unordered pair of names is already connected
    pub fn has_pair(&self, a: &str, b: &str) -> bool {
        let key = pair_key(a, b);
        self.connections
            .values()
            .any(|c| self.pair_key_of(c).as_deref() == Some(key.as_str()))
    }

    /// Pair key of a connection under the endpoints' current names
    pub fn pair_key_of(&self, connection: &Connection) -> Option<String> {
        let from = self.nodes.get(&connection.from)?;
        let to = self.nodes.get(&connection.to)?;
        Some(pair_key(&from.name, &to.name))
    }

    /// The committed neighbor of `adapter` on the given family side
    pub fn adapter_peer(&self, adapter: NodeId, side: Family) -> Option<&Node> {
        self.connections
            .values()
            .filter_map(|c| c.other_end(adapter))
            .filter_map(|peer| self.nodes.get(&peer))
            .find(|peer| peer.family() == side)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a node by name
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.registry.resolve(name).and_then(|id| self.nodes.get(&id))
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// All placed nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All placed node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// All committed connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Committed connections incident to a node
    pub fn connections_of(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves(node_id))
    }

    /// Number of placed nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of committed connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_pair() -> (Graph, NodeId, NodeId) {
        let mut graph = Graph::new("test");
        let a = graph.add_node(NodeKind::ClassicalHost, [0.0, 0.0]);
        let b = graph.add_node(NodeKind::ClassicalHost, [200.0, 0.0]);
        (graph, a, b)
    }

    #[test]
    fn test_duplicate_pair_rejected_in_both_directions() {
        let (mut graph, a, b) = host_pair();
        graph.add_connection(a, b).unwrap();
        assert_eq!(graph.connection_count(), 1);
        assert!(matches!(
            graph.add_connection(b, a),
            Err(GraphError::ConnectionAlreadyExists(_, _))
        ));
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    fn test_self_loop_rejected() {
        let (mut graph, a, _) = host_pair();
        assert_eq!(graph.add_connection(a, a), Err(GraphError::SelfConnection));
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_cross_family_rejected() {
        let mut graph = Graph::new("test");
        let qh = graph.add_node(NodeKind::QuantumHost, [0.0, 0.0]);
        let cr = graph.add_node(NodeKind::ClassicalRouter, [200.0, 0.0]);
        assert!(matches!(
            graph.add_connection(qh, cr),
            Err(GraphError::IncompatibleConnection { .. })
        ));
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_container_kinds_are_not_endpoints() {
        let mut graph = Graph::new("test");
        let host = graph.add_node(NodeKind::ClassicalHost, [0.0, 0.0]);
        let net = graph.add_node(NodeKind::ClassicalNetwork, [200.0, 0.0]);
        assert!(matches!(
            graph.add_connection(host, net),
            Err(GraphError::IncompatibleConnection { .. })
        ));
    }

    #[test]
    fn test_adapter_binds_one_peer_per_side() {
        let mut graph = Graph::new("test");
        let qa = graph.add_node(NodeKind::QuantumAdapter, [0.0, 0.0]);
        let qh1 = graph.add_node(NodeKind::QuantumHost, [200.0, 0.0]);
        let qh2 = graph.add_node(NodeKind::QuantumHost, [400.0, 0.0]);
        let ch = graph.add_node(NodeKind::ClassicalHost, [0.0, 200.0]);

        graph.add_connection(qa, qh1).unwrap();
        graph.add_connection(qa, ch).unwrap();
        assert_eq!(graph.adapter_peer(qa, Family::Quantum).map(|n| n.id), Some(qh1));
        assert_eq!(graph.adapter_peer(qa, Family::Classical).map(|n| n.id), Some(ch));

        // A second quantum-side peer is rejected, not replaced.
        assert!(matches!(
            graph.add_connection(qh2, qa),
            Err(GraphError::AdapterSideOccupied { family: Family::Quantum, .. })
        ));
        assert_eq!(graph.connection_count(), 2);
    }

    #[test]
    fn test_cascade_delete_removes_exactly_incident_edges() {
        let mut graph = Graph::new("test");
        let h1 = graph.add_node(NodeKind::ClassicalHost, [0.0, 0.0]);
        let r1 = graph.add_node(NodeKind::ClassicalRouter, [200.0, 0.0]);
        let h2 = graph.add_node(NodeKind::ClassicalHost, [400.0, 0.0]);
        graph.add_connection(h1, r1).unwrap();
        graph.add_connection(r1, h2).unwrap();

        let (_, removed) = graph.remove_node(r1).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(graph.connection_count(), 0);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_rename_collision_leaves_graph_unchanged() {
        let (mut graph, a, b) = host_pair();
        let name_b = graph.node(b).unwrap().name.clone();
        assert_eq!(
            graph.rename_node(a, &name_b),
            Err(GraphError::DuplicateNodeName(name_b.clone()))
        );
        assert_eq!(graph.node_by_name(&name_b).map(|n| n.id), Some(b));

        graph.rename_node(a, "edge-host").unwrap();
        assert_eq!(graph.node_by_name("edge-host").map(|n| n.id), Some(a));
    }

    #[test]
    fn test_rename_moves_pair_key() {
        let (mut graph, a, b) = host_pair();
        let conn_id = graph.add_connection(a, b).unwrap();
        graph.rename_node(a, "zzz-host").unwrap();
        let conn = graph.connection(conn_id).unwrap();
        let name_b = graph.node(b).unwrap().name.clone();
        assert_eq!(graph.pair_key_of(conn), Some(pair_key("zzz-host", &name_b)));
        assert!(graph.has_pair(&name_b, "zzz-host"));
    }

    #[test]
    fn test_graph_snapshot_round_trip() {
        let (mut graph, a, b) = host_pair();
        graph.add_connection(a, b).unwrap();
        let text = ron::to_string(&graph).unwrap();
        let loaded: Graph = ron::from_str(&text).unwrap();
        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.connection_count(), 1);
        assert!(loaded.node_by_name(&graph.node(a).unwrap().name).is_some());
    }
}
