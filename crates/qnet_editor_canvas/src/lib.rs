// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas-side editing logic for the QNet editor.
//!
//! This crate turns raw pointer gestures into validated graph edges and
//! keeps derived state in sync with structural changes:
//! - [`drag::ConnectionManager`] - the drag state machine producing
//!   committed connections
//! - [`tracking::MoveTracker`] - per-node move publisher keeping edge
//!   geometry aligned with node movement
//! - [`network::NetworkManager`] - derived membership bookkeeping and
//!   the observer subscription API
//! - [`session::EditorSession`] - the per-canvas context object wiring
//!   the pieces together (one session per editing surface, passed by
//!   reference; no global managers)
//!
//! Everything here is single-threaded and synchronous: a pointer-event
//! step never suspends, so the graph is consistent between any two
//! pointer events.

pub mod drag;
pub mod grace;
pub mod network;
pub mod session;
pub mod tracking;

pub use drag::{ConnectionManager, DragUpdate, InProgressEdge};
pub use grace::GraceQueue;
pub use network::{ConnectionEvent, NetworkId, NetworkManager, SubscriberId};
pub use session::EditorSession;
pub use tracking::{MoveTracker, SubscriptionId};

use egui::{pos2, vec2, Pos2, Rect};
use qnet_editor_graph::Node;

/// Bounding box of a placed node in canvas coordinates
pub fn node_rect(node: &Node) -> Rect {
    Rect::from_min_size(
        pos2(node.position[0], node.position[1]),
        vec2(node.size[0], node.size[1]),
    )
}

/// Center of a placed node in canvas coordinates
pub fn node_center(node: &Node) -> Pos2 {
    let [x, y] = node.center();
    pos2(x, y)
}
