// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the topology graph.

use crate::node::{Family, NodeId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default fiber loss applied to new connections, in dB/km
pub const DEFAULT_LOSS_PER_KM: f32 = 0.1;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A committed, undirected link between two distinct nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Originating endpoint
    pub from: NodeId,
    /// Target endpoint
    pub to: NodeId,
    /// Family of the originating node at creation time
    pub connection_type: Family,
    /// Fiber loss in dB/km
    pub loss_per_km: f32,
}

impl Connection {
    /// Create a new connection with the default loss
    pub fn new(from: NodeId, to: NodeId, connection_type: Family) -> Self {
        Self {
            id: ConnectionId::new(),
            from,
            to,
            connection_type,
            loss_per_km: DEFAULT_LOSS_PER_KM,
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves(&self, node_id: NodeId) -> bool {
        self.from == node_id || self.to == node_id
    }

    /// The endpoint opposite to `node_id`, if `node_id` is an endpoint
    pub fn other_end(&self, node_id: NodeId) -> Option<NodeId> {
        if self.from == node_id {
            Some(self.to)
        } else if self.to == node_id {
            Some(self.from)
        } else {
            None
        }
    }
}

/// Identifier of an unordered node pair: the two names joined after
/// lexicographic sort, so the same key is produced regardless of
/// direction.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}::{b}")
    } else {
        format!("{b}::{a}")
    }
}
