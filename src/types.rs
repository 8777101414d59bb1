//! Core types shared across the membership crate
//!
//! Gossip membership records as reported by peers. These are the untyped
//! inputs every classifier and gate operates on.

use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;
use serde::{Deserialize, Serialize};

/// Free-form gossip metadata tags
pub type Tags = HashMap<String, String>;

/// Liveness status of a gossip member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Status not yet known
    #[default]
    None,
    /// Member is alive and reachable
    Alive,
    /// Member announced it is leaving
    Leaving,
    /// Member left gracefully
    Left,
    /// Member failed health probes
    Failed,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberStatus::None => "none",
            MemberStatus::Alive => "alive",
            MemberStatus::Leaving => "leaving",
            MemberStatus::Left => "left",
            MemberStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A single peer-reported gossip membership record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GossipMember {
    /// Display name of the member
    pub name: String,
    /// Gossip advertise address
    pub addr: IpAddr,
    /// Liveness status
    #[serde(default)]
    pub status: MemberStatus,
    /// Metadata tags
    #[serde(default)]
    pub tags: Tags,
}

impl GossipMember {
    /// Member with no tags
    pub fn new(name: impl Into<String>, addr: IpAddr, status: MemberStatus) -> Self {
        Self {
            name: name.into(),
            addr,
            status,
            tags: Tags::new(),
        }
    }

    /// Builder-style tag insertion
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Whether the member is currently alive
    pub fn is_alive(&self) -> bool {
        self.status == MemberStatus::Alive
    }
}
