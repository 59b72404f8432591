// SPDX-License-Identifier: MIT OR Apache-2.0
//! Name registry: uniqueness enforcement and default-name allocation.

use crate::node::{NodeId, NodeKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Authoritative name index over the placed node set.
///
/// Every placed node holds exactly one entry here; inserts and renames
/// that would collide with an existing name are rejected before any
/// graph state changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeRegistry {
    by_name: IndexMap<String, NodeId>,
}

impl NodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Default name for the next node of `kind`: `"{KindLabel}-{n}"`
    /// where `n` is the number of placed nodes of any kind plus one.
    pub fn default_name(&self, kind: NodeKind) -> String {
        let mut n = self.by_name.len() + 1;
        let mut name = format!("{}-{}", kind.label(), n);
        // The count-based suffix can collide after deletions or renames.
        while self.by_name.contains_key(&name) {
            n += 1;
            name = format!("{}-{}", kind.label(), n);
        }
        name
    }

    /// Whether `name` is already taken
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Resolve a name to a node ID
    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Claim `name` for `id`. Returns `false` (and changes nothing) if
    /// the name is held by another node.
    pub fn claim(&mut self, name: &str, id: NodeId) -> bool {
        match self.by_name.get(name) {
            Some(existing) => *existing == id,
            None => {
                self.by_name.insert(name.to_owned(), id);
                true
            }
        }
    }

    /// Move `id` from `old` to `new`. Returns `false` if `new` is held
    /// by another node; the old claim is kept in that case.
    pub fn reclaim(&mut self, old: &str, new: &str, id: NodeId) -> bool {
        if old == new {
            return true;
        }
        if self.by_name.contains_key(new) {
            return false;
        }
        self.by_name.shift_remove(old);
        self.by_name.insert(new.to_owned(), id);
        true
    }

    /// Release a name on node deletion
    pub fn release(&mut self, name: &str) {
        self.by_name.shift_remove(name);
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
