// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-node move publisher for committed edge geometry.
//!
//! Each committed connection subscribes exactly once at commit time and
//! unsubscribes exactly once at delete time, identified by a
//! [`SubscriptionId`] handle. The tracker owns the screen-space segment
//! of every committed edge; the render surface reads segments back
//! instead of re-registering raw per-node listeners.

use egui::Pos2;
use indexmap::IndexMap;
use qnet_editor_graph::{ConnectionId, NodeId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle for a tracked edge subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Create a new random subscription ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct EdgeTrack {
    connection: ConnectionId,
    from: NodeId,
    to: NodeId,
    from_pos: Pos2,
    to_pos: Pos2,
}

/// Registry of committed-edge endpoint geometry
#[derive(Debug, Default)]
pub struct MoveTracker {
    tracks: IndexMap<SubscriptionId, EdgeTrack>,
    by_connection: IndexMap<ConnectionId, SubscriptionId>,
}

impl MoveTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a committed connection to endpoint movement.
    ///
    /// Idempotent per connection: re-subscribing returns the existing
    /// handle instead of adding a duplicate listener.
    pub fn subscribe(
        &mut self,
        connection: ConnectionId,
        from: NodeId,
        from_pos: Pos2,
        to: NodeId,
        to_pos: Pos2,
    ) -> SubscriptionId {
        if let Some(existing) = self.by_connection.get(&connection) {
            return *existing;
        }
        let id = SubscriptionId::new();
        self.tracks.insert(
            id,
            EdgeTrack {
                connection,
                from,
                to,
                from_pos,
                to_pos,
            },
        );
        self.by_connection.insert(connection, id);
        id
    }

    /// Drop a subscription by handle
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.tracks.shift_remove(&id) {
            Some(track) => {
                self.by_connection.shift_remove(&track.connection);
                true
            }
            None => false,
        }
    }

    /// Drop the subscription of a connection, if any
    pub fn unsubscribe_connection(&mut self, connection: ConnectionId) -> bool {
        match self.by_connection.shift_remove(&connection) {
            Some(id) => self.tracks.shift_remove(&id).is_some(),
            None => false,
        }
    }

    /// Update every tracked segment touching `node` with its new center.
    ///
    /// Returns the affected connections. Compatibility is not
    /// revalidated on movement.
    pub fn node_moved(&mut self, node: NodeId, center: Pos2) -> Vec<ConnectionId> {
        let mut affected = Vec::new();
        for track in self.tracks.values_mut() {
            let mut touched = false;
            if track.from == node {
                track.from_pos = center;
                touched = true;
            }
            if track.to == node {
                track.to_pos = center;
                touched = true;
            }
            if touched {
                affected.push(track.connection);
            }
        }
        affected
    }

    /// Screen-space segment of a tracked connection
    pub fn segment(&self, connection: ConnectionId) -> Option<(Pos2, Pos2)> {
        let id = self.by_connection.get(&connection)?;
        let track = self.tracks.get(id)?;
        Some((track.from_pos, track.to_pos))
    }

    /// All tracked segments, for the render surface
    pub fn segments(&self) -> impl Iterator<Item = (ConnectionId, Pos2, Pos2)> + '_ {
        self.tracks
            .values()
            .map(|t| (t.connection, t.from_pos, t.to_pos))
    }

    /// Number of tracked connections
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
