// SPDX-License-Identifier: MIT OR Apache-2.0
//! Topology graph model for the QNet editor.
//!
//! This crate is the single source of truth for a hybrid
//! classical/quantum network topology under construction:
//! - Typed nodes (hosts, routers, adapters, repeaters, zones, networks)
//! - Undirected, de-duplicated connections with family validation
//! - Globally unique node names with default-name allocation
//!
//! ## Architecture
//!
//! All mutation goes through [`Graph`] primitives; callers observe the
//! graph through queries and never hold references into its internal
//! collections. Structural-validation failures are reported as
//! [`GraphError`] values and never leave the graph partially mutated.

pub mod connection;
pub mod graph;
pub mod node;
pub mod registry;

pub use connection::{pair_key, Connection, ConnectionId, DEFAULT_LOSS_PER_KM};
pub use graph::{Graph, GraphError};
pub use node::{Family, LinkRole, Node, NodeId, NodeKind};
pub use registry::NodeRegistry;
