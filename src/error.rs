//! Error types for REAM membership

use thiserror::Error;

/// Result type for membership operations
pub type MembershipResult<T> = Result<T, MembershipError>;

/// Main error type for membership operations
#[derive(Error, Debug)]
pub enum MembershipError {
    /// RPC capability errors
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Version parsing errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),
}

/// Errors surfaced to the RPC dispatch layer when gating a node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The node's version attribute is missing or malformed
    #[error("Unable to determine node version")]
    UnknownVersion,

    /// The node runs a version older than the RPC baseline
    #[error("Node does not support RPC")]
    NodeLacksRpc,

    /// No node with this ID exists in the snapshot
    #[error("Unknown node {0:?}")]
    UnknownNode(String),

    /// The snapshot lookup itself failed
    #[error("Node lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

impl RpcError {
    /// Whether a retry after refreshing node metadata could succeed.
    ///
    /// An unknown version may be resolved once the node re-registers its
    /// attributes; a node known to be too old never will be.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RpcError::UnknownVersion | RpcError::Lookup(_))
    }
}

/// Failure reported by a node lookup collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct LookupError(pub String);

/// Version parsing errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Empty version string
    #[error("empty version string")]
    Empty,

    /// Does not match the version grammar
    #[error("malformed version {raw:?}: bad {reason}")]
    Malformed { raw: String, reason: &'static str },

    /// Pre-release or build identifiers rejected by semver
    #[error("malformed version {raw:?}: {source}")]
    Identifier {
        raw: String,
        #[source]
        source: semver::Error,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Read(String),

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config file: {0}")]
    Parse(String),

    /// A configured field is empty
    #[error("Config field `{0}` must not be empty")]
    EmptyField(&'static str),

    /// The configured RPC threshold is not a version
    #[error("Invalid minimum RPC version: {0}")]
    InvalidThreshold(#[from] VersionError),
}
