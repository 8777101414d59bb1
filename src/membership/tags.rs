//! Per-field tag decoding
//!
//! Each field of a server descriptor is decoded under one of three policies:
//!
//! - **mandatory-strict**: the tag must be present and well-formed
//! - **optional-strict**: the tag may be absent, but if present it must parse
//! - **optional-lenient**: absence and malformed values both fall back to a default
//!
//! Failures are reported as [`TagError`] so the classifier can log why a
//! record was excluded. They never leave the membership module.

use std::fmt;
use std::str::FromStr;
use tracing::trace;
use crate::types::Tags;

/// Recognized gossip tag keys
pub mod keys {
    pub const ROLE: &str = "role";
    pub const ID: &str = "id";
    pub const REGION: &str = "region";
    pub const DATACENTER: &str = "dc";
    pub const BOOTSTRAP: &str = "bootstrap";
    pub const EXPECT: &str = "expect";
    pub const RPC_ADDR: &str = "rpc_addr";
    pub const PORT: &str = "port";
    pub const BUILD: &str = "build";
    /// Historically the protocol version; now the major version
    pub const MAJOR_VERSION: &str = "vsn";
    /// Minor version number, absent on older servers
    pub const MINOR_VERSION: &str = "mvn";
    pub const RAFT_VERSION: &str = "raft_vsn";
}

/// Why a tag could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TagError {
    Missing(&'static str),
    Malformed { key: &'static str, value: String },
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::Missing(key) => write!(f, "missing `{}` tag", key),
            TagError::Malformed { key, value } => write!(f, "malformed `{}` tag: {:?}", key, value),
        }
    }
}

/// Read-only view over a member's tags
pub(crate) struct TagReader<'a> {
    member: &'a str,
    tags: &'a Tags,
}

impl<'a> TagReader<'a> {
    pub fn new(member: &'a str, tags: &'a Tags) -> Self {
        Self { member, tags }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Presence-only flag; the value is ignored
    pub fn flag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Free text, empty when absent
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Mandatory-strict decode with a custom parser
    pub fn required_with<T, E>(
        &self,
        key: &'static str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<T, TagError> {
        let raw = self.get(key).ok_or(TagError::Missing(key))?;
        parse(raw).map_err(|_| TagError::Malformed {
            key,
            value: raw.to_string(),
        })
    }

    /// Mandatory-strict decode
    pub fn required<T: FromStr>(&self, key: &'static str) -> Result<T, TagError> {
        self.required_with(key, str::parse::<T>)
    }

    /// Optional-strict decode: absent yields `default`, malformed is an error
    pub fn optional<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, TagError> {
        match self.get(key) {
            None => Ok(default),
            Some(_) => self.required(key),
        }
    }

    /// Optional-lenient decode: absent and malformed both yield `default`
    pub fn lenient<T: FromStr>(&self, key: &'static str, default: T) -> T {
        match self.get(key) {
            None => default,
            Some(raw) => match raw.parse::<T>() {
                Ok(value) => value,
                Err(_) => {
                    trace!(member = self.member, key, value = raw, "ignoring malformed tag");
                    default
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_required_missing_and_malformed() {
        let t = tags(&[("port", "abc")]);
        let reader = TagReader::new("m", &t);
        assert_eq!(reader.required::<u16>(keys::BUILD), Err(TagError::Missing("build")));
        assert_eq!(
            reader.required::<u16>(keys::PORT),
            Err(TagError::Malformed { key: "port", value: "abc".into() })
        );
    }

    #[test]
    fn test_optional_strict() {
        let t = tags(&[("expect", "3")]);
        let reader = TagReader::new("m", &t);
        assert_eq!(reader.optional::<i64>(keys::EXPECT, 0), Ok(3));
        assert_eq!(reader.optional::<i64>(keys::RAFT_VERSION, 0), Ok(0));

        let t = tags(&[("expect", "three")]);
        let reader = TagReader::new("m", &t);
        assert!(reader.optional::<i64>(keys::EXPECT, 0).is_err());
    }

    #[test]
    fn test_lenient_defaults() {
        let t = tags(&[("mvn", "x")]);
        let reader = TagReader::new("m", &t);
        assert_eq!(reader.lenient::<i64>(keys::MINOR_VERSION, 0), 0);

        let t = tags(&[("mvn", "7")]);
        let reader = TagReader::new("m", &t);
        assert_eq!(reader.lenient::<i64>(keys::MINOR_VERSION, 0), 7);
    }

    #[test]
    fn test_flag_ignores_value() {
        let t = tags(&[("bootstrap", "0")]);
        let reader = TagReader::new("m", &t);
        assert!(reader.flag(keys::BOOTSTRAP));
        assert!(!reader.flag(keys::EXPECT));
    }
}
