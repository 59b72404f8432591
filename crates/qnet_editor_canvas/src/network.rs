// SPDX-License-Identifier: MIT OR Apache-2.0
//! Derived network membership and structural-change notification.
//!
//! The network manager is decoupled from the connection manager:
//! observers subscribe here and are notified after every commit,
//! removal, and move without the connection manager knowing who
//! listens. Membership of elementary classical nodes is tracked with a
//! union-find over node IDs, so connecting two hosts (directly or
//! through routers) makes them resolve to the same logical network.

use indexmap::IndexMap;
use qnet_editor_graph::{ConnectionId, Graph, NodeId};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Identifier of a logical classical network (the membership root)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(pub NodeId);

/// Handle for a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

/// Structural change delivered to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A connection was committed
    Created {
        /// The committed connection
        connection: ConnectionId,
        /// Originating endpoint
        from: NodeId,
        /// Target endpoint
        to: NodeId,
    },
    /// A committed connection was removed
    Removed {
        /// The removed connection
        connection: ConnectionId,
        /// Originating endpoint
        from: NodeId,
        /// Target endpoint
        to: NodeId,
    },
    /// A node moved; observers should re-poll edge geometry
    NodeMoved {
        /// The moved node
        node: NodeId,
    },
}

type Subscriber = Box<dyn FnMut(&ConnectionEvent)>;

/// Membership bookkeeping plus the observer extension point
#[derive(Default)]
pub struct NetworkManager {
    // Union-find parent links; absent nodes are their own singleton.
    parent: IndexMap<NodeId, NodeId>,
    subscribers: IndexMap<SubscriberId, Subscriber>,
    next_subscriber: usize,
}

impl NetworkManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer invoked after every commit, removal, and
    /// move. Returns a handle for [`NetworkManager::unsubscribe`].
    pub fn subscribe(&mut self, callback: impl FnMut(&ConnectionEvent) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.insert(id, Box::new(callback));
        id
    }

    /// Remove an observer
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.shift_remove(&id).is_some()
    }

    /// React to a committed connection: merge classical membership when
    /// both endpoints are elementary classical, then notify observers.
    pub fn on_connection_created(
        &mut self,
        graph: &Graph,
        connection: ConnectionId,
        from: NodeId,
        to: NodeId,
    ) {
        let classical = |id: NodeId| {
            graph
                .node(id)
                .is_some_and(|n| n.kind.is_elementary() && n.family() == qnet_editor_graph::Family::Classical)
        };
        if classical(from) && classical(to) {
            self.union(from, to);
            tracing::debug!(?from, ?to, "classical membership merged");
        }
        self.notify(&ConnectionEvent::Created { connection, from, to });
    }

    /// React to a removed connection. Membership is not re-split on
    /// disconnect; it only grows while editing (matches the source
    /// behavior this replaces).
    pub fn on_connection_removed(&mut self, connection: ConnectionId, from: NodeId, to: NodeId) {
        self.notify(&ConnectionEvent::Removed { connection, from, to });
    }

    /// React to a node move by re-firing observer callbacks
    pub fn on_node_moved(&mut self, node: NodeId) {
        self.notify(&ConnectionEvent::NodeMoved { node });
    }

    /// Logical network of a node. Two nodes linked through any chain of
    /// elementary classical connections resolve to the same ID.
    pub fn network_of(&self, node: NodeId) -> NetworkId {
        NetworkId(self.root(node))
    }

    /// Forget all membership while keeping registered observers.
    /// Used when the underlying graph is swapped out wholesale.
    pub fn reset_membership(&mut self) {
        self.parent.clear();
    }

    fn root(&self, mut node: NodeId) -> NodeId {
        while let Some(parent) = self.parent.get(&node) {
            if *parent == node {
                break;
            }
            node = *parent;
        }
        node
    }

    fn union(&mut self, a: NodeId, b: NodeId) {
        let ra = self.root(a);
        let rb = self.root(b);
        if ra != rb {
            self.parent.insert(ra, rb);
        }
    }

    /// Deliver an event to every observer. A panicking observer is
    /// logged and skipped; the remaining observers still run.
    fn notify(&mut self, event: &ConnectionEvent) {
        for (id, subscriber) in &mut self.subscribers {
            let outcome = catch_unwind(AssertUnwindSafe(|| subscriber(event)));
            if outcome.is_err() {
                tracing::warn!(subscriber = id.0, ?event, "observer panicked; continuing delivery");
            }
        }
    }

    /// Number of registered observers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
