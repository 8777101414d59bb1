//! Node capability gate
//!
//! Decides whether a registered node runs a version new enough to accept
//! RPCs from servers. A node whose version cannot be determined is reported
//! differently from one known to be too old: the first may resolve after a
//! metadata refresh, the second is a hard rejection.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::RpcError;
use crate::gate::snapshot::NodeLookup;
use crate::version::{parse_version, VersionThreshold};

/// Attribute under which nodes report their software version
pub const VERSION_ATTRIBUTE: &str = "ream.version";

/// A registered worker node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Node {
    /// Node with no attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: HashMap::new(),
        }
    }

    /// Builder-style attribute insertion
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Gate for node RPC support
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcGate {
    threshold: VersionThreshold,
    version_attribute: String,
}

impl RpcGate {
    /// Gate reading the version from [`VERSION_ATTRIBUTE`]
    pub fn new(threshold: VersionThreshold) -> Self {
        Self {
            threshold,
            version_attribute: VERSION_ATTRIBUTE.to_string(),
        }
    }

    /// Read the version from a different attribute key
    pub fn with_version_attribute(mut self, key: impl Into<String>) -> Self {
        self.version_attribute = key.into();
        self
    }

    /// Minimum version a node must report
    pub fn threshold(&self) -> &VersionThreshold {
        &self.threshold
    }

    /// Attribute key holding the node version
    pub fn version_attribute(&self) -> &str {
        &self.version_attribute
    }

    /// Check that the node's advertised version meets the threshold
    pub fn supports_rpc(&self, node: &Node) -> Result<(), RpcError> {
        let raw = node
            .attributes
            .get(&self.version_attribute)
            .ok_or(RpcError::UnknownVersion)?;

        let version = parse_version(raw).map_err(|e| {
            debug!(node = %node.id, error = %e, "unparseable node version");
            RpcError::UnknownVersion
        })?;

        if !self.threshold.admits(&version) {
            return Err(RpcError::NodeLacksRpc);
        }

        Ok(())
    }

    /// Look up a node and check that it can be sent RPCs
    pub fn resolve_rpc_target<L>(&self, snapshot: &L, node_id: &str) -> Result<Node, RpcError>
    where
        L: NodeLookup + ?Sized,
    {
        let node = snapshot
            .node_by_id(node_id)?
            .ok_or_else(|| RpcError::UnknownNode(node_id.to_string()))?;

        self.supports_rpc(&node)?;
        Ok(node)
    }
}

impl Default for RpcGate {
    fn default() -> Self {
        Self::new(VersionThreshold::rpc_baseline())
    }
}
