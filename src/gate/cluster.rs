//! Cluster-wide version gate
//!
//! Used before enabling behaviour that every alive server must understand.
//! Members that are not servers, or not alive, do not take part.

use tracing::warn;
use crate::membership::{alive_servers, MemberClassifier, ServerDescriptor};
use crate::types::GossipMember;
use crate::version::{less_than, BuildVersion};

/// Whether all alive servers run at least `min_version`
pub fn meets_minimum_version(members: &[GossipMember], min_version: &BuildVersion) -> bool {
    meets_minimum_version_with(&MemberClassifier::default(), members, min_version)
}

/// [`meets_minimum_version`] with an explicit classifier
pub fn meets_minimum_version_with(
    classifier: &MemberClassifier,
    members: &[GossipMember],
    min_version: &BuildVersion,
) -> bool {
    for server in alive_servers(classifier, members) {
        if !is_compliant(&server, min_version) {
            warn!(
                server = %server,
                build = %server.build,
                minimum = %min_version,
                "server below minimum version"
            );
            return false;
        }
    }
    true
}

/// A pre-release of exactly the minimum's segments still counts, since
/// plain precedence would put `0.8.0-rc1` below `0.8.0`.
fn is_compliant(server: &ServerDescriptor, min_version: &BuildVersion) -> bool {
    let same_core = server.build.segments() == min_version.segments();
    !less_than(&server.build, min_version) || same_core
}
