//! Version gates
//!
//! Cluster-wide and per-node checks deciding whether peers are new enough
//! for version-sensitive RPCs during rolling upgrades.

pub mod cluster;
pub mod node;
pub mod snapshot;

pub use cluster::{meets_minimum_version, meets_minimum_version_with};
pub use node::{Node, RpcGate, VERSION_ATTRIBUTE};
pub use snapshot::{InMemorySnapshot, NodeLookup};
