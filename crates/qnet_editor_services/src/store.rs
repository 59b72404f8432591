// SPDX-License-Identifier: MIT OR Apache-2.0
//! Topology persistence.

use crate::ServiceError;
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use qnet_editor_document::WorldDocument;

/// Persistence seam for topology documents.
///
/// `save` hands back a storage key the caller passes to `load` and
/// `delete` unchanged; how the key is derived is the store's business.
#[async_trait]
pub trait TopologyStore: Send + Sync {
    /// Save a document, returning its opaque storage key
    async fn save(&self, world: &WorldDocument) -> Result<String, ServiceError>;
    /// Load the document stored under `key`
    async fn load(&self, key: &str) -> Result<WorldDocument, ServiceError>;
    /// Delete the document stored under `key`
    async fn delete(&self, key: &str) -> Result<(), ServiceError>;
    /// Keys of every stored document, in save order
    async fn list(&self) -> Result<Vec<String>, ServiceError>;
}

/// In-memory store backing tests and offline sessions.
///
/// Documents pass through JSON on save so anything unserializable fails
/// here rather than at first real persistence.
#[derive(Default)]
pub struct MemoryStore {
    worlds: RwLock<IndexMap<String, WorldDocument>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TopologyStore for MemoryStore {
    async fn save(&self, world: &WorldDocument) -> Result<String, ServiceError> {
        let text = serde_json::to_string(world)?;
        let stored: WorldDocument = serde_json::from_str(&text)?;
        // This store derives the key from the world name; callers must
        // still treat the returned key as opaque.
        let key = world.name.clone();
        tracing::debug!(%key, "topology saved");
        self.worlds.write().insert(key.clone(), stored);
        Ok(key)
    }

    async fn load(&self, key: &str) -> Result<WorldDocument, ServiceError> {
        self.worlds
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(key.to_owned()))
    }

    async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        match self.worlds.write().shift_remove(key) {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(key.to_owned())),
        }
    }

    async fn list(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.worlds.read().keys().cloned().collect())
    }
}
