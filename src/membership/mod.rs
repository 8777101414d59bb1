//! Gossip membership classification
//!
//! Decides which gossip members are control-plane servers and decodes their
//! metadata tags into typed descriptors.

pub mod classifier;
pub mod server;
pub mod tags;

pub use classifier::{MemberClassifier, DEFAULT_SERVER_ROLE};
pub use server::{ServerDescriptor, UNKNOWN_SERVER_ID};

use crate::types::GossipMember;

/// All members that classify as servers, in input order
pub fn servers<'a>(
    classifier: &'a MemberClassifier,
    members: &'a [GossipMember],
) -> impl Iterator<Item = ServerDescriptor> + 'a {
    members.iter().filter_map(move |member| classifier.classify(member))
}

/// Servers currently reporting alive status
pub fn alive_servers<'a>(
    classifier: &'a MemberClassifier,
    members: &'a [GossipMember],
) -> impl Iterator<Item = ServerDescriptor> + 'a {
    servers(classifier, members).filter(ServerDescriptor::is_alive)
}
