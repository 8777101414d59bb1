//! Node lookup collaborator
//!
//! The capability gate never owns cluster state. It asks a point-in-time
//! snapshot for nodes by ID; keeping that view consistent is the
//! snapshot's job.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use crate::error::{ConfigError, LookupError};
use crate::gate::node::Node;

/// Point-in-time node lookup
pub trait NodeLookup {
    /// Find a node by ID. `Ok(None)` means the node is not registered.
    fn node_by_id(&self, node_id: &str) -> Result<Option<Node>, LookupError>;
}

/// Snapshot backed by an in-memory map
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshot {
    nodes: HashMap<String, Node>,
}

impl InMemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Load a JSON array of nodes
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(e.to_string()))?;
        let nodes: Vec<Node> = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(nodes.into_iter().collect())
    }
}

impl FromIterator<Node> for InMemorySnapshot {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for node in iter {
            snapshot.insert(node);
        }
        snapshot
    }
}

impl NodeLookup for InMemorySnapshot {
    fn node_by_id(&self, node_id: &str) -> Result<Option<Node>, LookupError> {
        Ok(self.nodes.get(node_id).cloned())
    }
}
