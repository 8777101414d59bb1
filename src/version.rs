//! Build version handling for gossip tags and node attributes
//!
//! Peers advertise their build as free text, and older binaries were not
//! strict about it: `v0.8`, `1.02.0`, `0.7.0rc1` and four-segment builds all
//! appear in the wild. Every one of them must parse, otherwise an old server
//! would silently drop out of a cluster-wide version check.
//!
//! Grammar: `v? N(.N)* (-?PRE)? (+BUILD)?`. A short core is padded with zero
//! segments to major.minor.patch; longer cores keep every segment. A
//! pre-release without a hyphen must start with a letter. Pre-release and
//! build identifiers follow the semver grammar.

use std::cmp::Ordering;
use std::fmt;
use semver::{BuildMetadata, Prerelease};
use serde::{Serialize, Serializer};
use crate::error::VersionError;

/// Minimum node version accepting server-initiated RPCs
pub const RPC_BASELINE: &str = "0.8.0-rc1";

/// A peer-advertised build version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildVersion {
    segments: Vec<u64>,
    pre: Prerelease,
    build: BuildMetadata,
}

impl BuildVersion {
    /// Plain release version with no pre-release or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            segments: vec![major, minor, patch],
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
        }
    }

    /// Numeric segments, at least three
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    pub fn major(&self) -> u64 {
        self.segments[0]
    }

    pub fn minor(&self) -> u64 {
        self.segments[1]
    }

    pub fn patch(&self) -> u64 {
        self.segments[2]
    }

    /// Pre-release identifiers, empty for a release
    pub fn pre(&self) -> &Prerelease {
        &self.pre
    }

    /// Build metadata, ignored for ordering
    pub fn build_metadata(&self) -> &BuildMetadata {
        &self.build
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

impl Serialize for BuildVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a version string as advertised by a peer
pub fn parse_version(raw: &str) -> Result<BuildVersion, VersionError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(VersionError::Empty);
    }

    let malformed = |reason: &'static str| VersionError::Malformed {
        raw: raw.to_string(),
        reason,
    };
    let identifier = |source: semver::Error| VersionError::Identifier {
        raw: raw.to_string(),
        source,
    };

    let (rest, build) = match trimmed.split_once('+') {
        Some((rest, meta)) if !meta.is_empty() => {
            (rest, BuildMetadata::new(meta).map_err(identifier)?)
        }
        Some(_) => return Err(malformed("empty build metadata")),
        None => (trimmed, BuildMetadata::EMPTY),
    };

    let core_end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let (core, tail) = rest.split_at(core_end);

    let mut segments = core
        .split('.')
        .map(str::parse::<u64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed("numeric segments"))?;
    while segments.len() < 3 {
        segments.push(0);
    }

    let pre = match tail.strip_prefix('-') {
        Some("") => return Err(malformed("empty pre-release")),
        Some(pre) => Prerelease::new(pre).map_err(identifier)?,
        None if tail.is_empty() => Prerelease::EMPTY,
        None if tail.starts_with(|c: char| c.is_ascii_alphabetic()) => {
            Prerelease::new(tail).map_err(identifier)?
        }
        None => return Err(malformed("pre-release")),
    };

    Ok(BuildVersion { segments, pre, build })
}

/// Compare by precedence: segments (shorter padded with zeros), then
/// pre-release. Build metadata is ignored.
pub fn compare(a: &BuildVersion, b: &BuildVersion) -> Ordering {
    let len = a.segments.len().max(b.segments.len());
    for i in 0..len {
        let x = a.segments.get(i).copied().unwrap_or(0);
        let y = b.segments.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.pre.cmp(&b.pre)
}

/// True if `a` has strictly lower precedence than `b`
pub fn less_than(a: &BuildVersion, b: &BuildVersion) -> bool {
    compare(a, b) == Ordering::Less
}

/// Immutable minimum version used to gate a capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionThreshold {
    version: BuildVersion,
}

impl VersionThreshold {
    /// Wrap an already parsed version
    pub fn new(version: BuildVersion) -> Self {
        Self { version }
    }

    /// Parse a threshold from its textual form
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        parse_version(raw).map(Self::new)
    }

    /// Threshold for server-initiated node RPCs, see [`RPC_BASELINE`]
    pub fn rpc_baseline() -> Self {
        Self::parse(RPC_BASELINE).expect("RPC_BASELINE is a valid version")
    }

    /// The minimum version itself
    pub fn version(&self) -> &BuildVersion {
        &self.version
    }

    /// Whether `candidate` is at or above this threshold
    pub fn admits(&self, candidate: &BuildVersion) -> bool {
        !less_than(candidate, &self.version)
    }
}

impl fmt::Display for VersionThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}
