// SPDX-License-Identifier: MIT OR Apache-2.0
//! Backend services for the QNet editor.
//!
//! Two seams to the outside world: [`SimulationClient`] starts a
//! simulation run from a topology document and streams its events back,
//! and [`TopologyStore`] persists documents by name. Both are traits so
//! the editor core never depends on a concrete transport; the in-memory
//! implementations here back tests and offline use.

pub mod event;
pub mod simulation;
pub mod store;

pub use event::{EventKind, SimulationEvent};
pub use simulation::{RunHandle, ScriptedSimulation, SimulationClient};
pub use store::{MemoryStore, TopologyStore};

/// Error surface shared by the backend services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The backend rejected the submitted topology
    #[error("simulation rejected topology: {0}")]
    Rejected(String),

    /// No stored topology under the requested name
    #[error("no stored topology named {0:?}")]
    NotFound(String),

    /// A document failed to serialize or deserialize
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport to the backend failed
    #[error("backend transport failed: {0}")]
    Transport(String),
}
