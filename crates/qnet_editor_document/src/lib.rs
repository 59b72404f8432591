// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canonical topology document and the export/import protocol.
//!
//! The topology document is the serialized snapshot exchanged with the
//! simulation backend: a world containing zones, each zone containing
//! networks (hosts plus connections) and adapters. Export groups live
//! nodes by geometric containment; import rebuilds a live graph in
//! containment order and aborts as a whole on any unresolved reference,
//! so a partially connected graph can never reach the backend.

pub mod export;
pub mod import;
pub mod model;

pub use export::{export, PX_PER_KM};
pub use import::{import, ImportError};
pub use model::{
    AdapterDocument, ConnectionDocument, HostDocument, NetworkDocument, WorldDocument,
    ZoneDocument,
};
