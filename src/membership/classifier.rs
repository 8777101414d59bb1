//! Member classification
//!
//! Turns a gossip membership record into a [`ServerDescriptor`], or decides
//! that the member is not a control-plane server. Worker and client members
//! are the common case and are not an error. Malformed server records are
//! excluded the same way, with the reason logged at debug level.

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU16;
use tracing::debug;
use crate::membership::server::{ServerDescriptor, UNKNOWN_SERVER_ID};
use crate::membership::tags::{keys, TagError, TagReader};
use crate::types::GossipMember;
use crate::version::parse_version;

/// Role tag value advertised by control-plane servers
pub const DEFAULT_SERVER_ROLE: &str = "ream";

/// Classifies gossip members as control-plane servers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberClassifier {
    role: String,
}

impl MemberClassifier {
    /// Classifier matching a custom role marker
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }

    /// Role tag value this classifier accepts
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Whether the member is a well-formed server record
    pub fn is_server(&self, member: &GossipMember) -> bool {
        self.classify(member).is_some()
    }

    /// Decode the member into a server descriptor.
    ///
    /// Returns `None` for members that do not carry the server role, and
    /// for server records whose mandatory or strictly-optional tags fail to
    /// parse. Never returns a partially filled descriptor.
    pub fn classify(&self, member: &GossipMember) -> Option<ServerDescriptor> {
        let reader = TagReader::new(&member.name, &member.tags);
        if reader.get(keys::ROLE) != Some(self.role.as_str()) {
            return None;
        }

        match decode(member, &reader) {
            Ok(server) => Some(server),
            Err(reason) => {
                debug!(member = %member.name, %reason, "excluding malformed server record");
                None
            }
        }
    }
}

impl Default for MemberClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_ROLE)
    }
}

fn decode(member: &GossipMember, reader: &TagReader<'_>) -> Result<ServerDescriptor, TagError> {
    let id = reader.text_or(keys::ID, UNKNOWN_SERVER_ID);
    let region = reader.text(keys::REGION);
    let datacenter = reader.text(keys::DATACENTER);
    let bootstrap = reader.flag(keys::BOOTSTRAP);
    let expect = reader.optional::<i64>(keys::EXPECT, 0)?;

    // Missing or unparseable rpc_addr falls back to the gossip address
    let rpc_ip = reader
        .get(keys::RPC_ADDR)
        .and_then(|raw| raw.parse::<IpAddr>().ok())
        .unwrap_or(member.addr);

    // Port 0 is never a usable server address
    let port = reader.required::<NonZeroU16>(keys::PORT)?.get();
    let build = reader.required_with(keys::BUILD, parse_version)?;
    let major_version = reader.required::<i64>(keys::MAJOR_VERSION)?;
    let minor_version = reader.lenient::<i64>(keys::MINOR_VERSION, 0);
    let raft_version = reader.optional::<i64>(keys::RAFT_VERSION, 0)?;

    Ok(ServerDescriptor {
        name: member.name.clone(),
        id,
        region,
        datacenter,
        port,
        bootstrap,
        expect,
        major_version,
        minor_version,
        raft_version,
        build,
        address: SocketAddr::new(member.addr, port),
        rpc_address: SocketAddr::new(rpc_ip, port),
        status: member.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::BuildVersion;
    use crate::types::MemberStatus;

    fn server(name: &str) -> GossipMember {
        GossipMember::new(name, "10.0.0.1".parse().unwrap(), MemberStatus::Alive)
            .with_tag("role", "ream")
            .with_tag("port", "4647")
            .with_tag("build", "1.2.3")
            .with_tag("vsn", "1")
    }

    #[test]
    fn test_minimal_server_defaults() {
        let parts = MemberClassifier::default().classify(&server("s1")).unwrap();
        assert_eq!(parts.name, "s1");
        assert_eq!(parts.id, "unknown");
        assert_eq!(parts.region, "");
        assert_eq!(parts.datacenter, "");
        assert_eq!(parts.port, 4647);
        assert!(!parts.bootstrap);
        assert_eq!(parts.expect, 0);
        assert_eq!(parts.major_version, 1);
        assert_eq!(parts.minor_version, 0);
        assert_eq!(parts.raft_version, 0);
        assert_eq!(parts.build, BuildVersion::new(1, 2, 3));
        assert_eq!(parts.address, "10.0.0.1:4647".parse().unwrap());
        assert_eq!(parts.rpc_address, "10.0.0.1:4647".parse().unwrap());
        assert_eq!(parts.status, MemberStatus::Alive);
    }

    #[test]
    fn test_full_server() {
        let member = server("s2")
            .with_tag("id", "abc-123")
            .with_tag("region", "global")
            .with_tag("dc", "dc1")
            .with_tag("bootstrap", "")
            .with_tag("expect", "3")
            .with_tag("rpc_addr", "192.168.1.5")
            .with_tag("mvn", "2")
            .with_tag("raft_vsn", "3");
        let parts = MemberClassifier::default().classify(&member).unwrap();
        assert_eq!(parts.id, "abc-123");
        assert_eq!(parts.region, "global");
        assert_eq!(parts.datacenter, "dc1");
        assert!(parts.bootstrap);
        assert_eq!(parts.expect, 3);
        assert_eq!(parts.minor_version, 2);
        assert_eq!(parts.raft_version, 3);
        assert_eq!(parts.rpc_address, "192.168.1.5:4647".parse().unwrap());
        assert_eq!(parts.to_string(), "s2 (Addr: 10.0.0.1:4647) (DC: dc1)");
    }

    #[test]
    fn test_wrong_role_is_not_server() {
        let member = server("c1").with_tag("role", "client");
        assert!(!MemberClassifier::default().is_server(&member));

        let mut member = server("c2");
        member.tags.remove("role");
        assert!(!MemberClassifier::default().is_server(&member));
    }

    #[test]
    fn test_custom_role() {
        let classifier = MemberClassifier::new("control");
        assert!(!classifier.is_server(&server("s1")));
        assert!(classifier.is_server(&server("s1").with_tag("role", "control")));
    }

    #[test]
    fn test_mandatory_fields() {
        let classifier = MemberClassifier::default();
        for key in ["port", "build", "vsn"] {
            let mut member = server("s1");
            member.tags.remove(key);
            assert!(classifier.classify(&member).is_none(), "missing {}", key);
        }
        assert!(classifier.classify(&server("s1").with_tag("port", "http")).is_none());
        assert!(classifier.classify(&server("s1").with_tag("port", "70000")).is_none());
        assert!(classifier.classify(&server("s1").with_tag("port", "0")).is_none());
        assert!(classifier.classify(&server("s1").with_tag("build", "not-a-version")).is_none());
        assert!(classifier.classify(&server("s1").with_tag("vsn", "one")).is_none());
    }

    #[test]
    fn test_strict_optional_fields() {
        let classifier = MemberClassifier::default();
        assert!(classifier.classify(&server("s1").with_tag("expect", "three")).is_none());
        assert!(classifier.classify(&server("s1").with_tag("raft_vsn", "x")).is_none());
    }

    #[test]
    fn test_loose_build_versions_classify() {
        let classifier = MemberClassifier::default();
        for (build, expected) in [
            ("0.8.0rc1", "0.8.0-rc1"),
            ("1.02.0", "1.2.0"),
            ("1.2.3.4", "1.2.3.4"),
            ("v0.9", "0.9.0"),
        ] {
            let parts = classifier.classify(&server("s1").with_tag("build", build)).unwrap();
            assert_eq!(parts.build.to_string(), expected, "build {}", build);
        }
    }

    #[test]
    fn test_wide_integer_tags() {
        let parts = MemberClassifier::default()
            .classify(
                &server("s1")
                    .with_tag("vsn", "4294967296")
                    .with_tag("expect", "3000000000")
                    .with_tag("raft_vsn", "-1"),
            )
            .unwrap();
        assert_eq!(parts.major_version, 4_294_967_296);
        assert_eq!(parts.expect, 3_000_000_000);
        assert_eq!(parts.raft_version, -1);
    }

    #[test]
    fn test_malformed_minor_version_tolerated() {
        let parts = MemberClassifier::default()
            .classify(&server("s1").with_tag("mvn", "garbage"))
            .unwrap();
        assert_eq!(parts.minor_version, 0);
    }

    #[test]
    fn test_bad_rpc_addr_falls_back() {
        let parts = MemberClassifier::default()
            .classify(&server("s1").with_tag("rpc_addr", "not-an-ip"))
            .unwrap();
        assert_eq!(parts.rpc_address, "10.0.0.1:4647".parse().unwrap());
    }

    #[test]
    fn test_status_copied_verbatim() {
        let mut member = server("s1");
        member.status = MemberStatus::Left;
        let parts = MemberClassifier::default().classify(&member).unwrap();
        assert_eq!(parts.status, MemberStatus::Left);
        assert!(!parts.is_alive());
    }
}
