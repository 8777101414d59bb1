//! # REAM Membership
//!
//! Cluster membership classification and version-gated RPC capability checks.
//!
//! Gossip peers advertise loosely typed metadata tags. During rolling
//! upgrades old and new binaries coexist, so the control plane must decide
//! which members are servers and whether peers are new enough before it
//! relies on version-sensitive RPCs.
//!
//! - [`membership`] classifies gossip members into [`ServerDescriptor`]s
//! - [`gate::meets_minimum_version`] checks every alive server against a minimum
//! - [`RpcGate`] checks a single node, optionally resolved from a snapshot

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod gate;
pub mod membership;
pub mod types;
pub mod version;

// Re-export main types
pub use config::GateConfig;
pub use error::{
    ConfigError, LookupError, MembershipError, MembershipResult, RpcError, VersionError,
};
pub use gate::{meets_minimum_version, InMemorySnapshot, Node, NodeLookup, RpcGate};
pub use membership::{MemberClassifier, ServerDescriptor};
pub use types::{GossipMember, MemberStatus, Tags};
pub use version::{parse_version, BuildVersion, VersionThreshold};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
