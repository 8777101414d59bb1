//! Typed descriptor of a control-plane server member

use std::fmt;
use std::net::SocketAddr;
use serde::Serialize;
use crate::types::MemberStatus;
use crate::version::BuildVersion;

/// ID used when a server does not advertise one
pub const UNKNOWN_SERVER_ID: &str = "unknown";

/// Point-in-time view of one server, built from its gossip record.
///
/// Membership changes constantly; a descriptor is only valid for the
/// instant it was classified. Cloning yields an independent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerDescriptor {
    pub name: String,
    pub id: String,
    pub region: String,
    pub datacenter: String,
    pub port: u16,
    pub bootstrap: bool,
    pub expect: i64,
    pub major_version: i64,
    pub minor_version: i64,
    pub raft_version: i64,
    pub build: BuildVersion,
    pub address: SocketAddr,
    pub rpc_address: SocketAddr,
    pub status: MemberStatus,
}

impl ServerDescriptor {
    /// Whether the server reported alive status when classified
    pub fn is_alive(&self) -> bool {
        self.status == MemberStatus::Alive
    }
}

impl fmt::Display for ServerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Addr: {}) (DC: {})", self.name, self.address, self.datacenter)
    }
}
