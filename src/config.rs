//! Gate configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid configuration.

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use crate::gate::{RpcGate, VERSION_ATTRIBUTE};
use crate::membership::{MemberClassifier, DEFAULT_SERVER_ROLE};
use crate::version::{VersionThreshold, RPC_BASELINE};

/// Membership and gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Role tag value identifying servers
    pub role: String,
    /// Node attribute holding the software version
    pub version_attribute: String,
    /// Minimum node version accepting RPCs
    pub min_rpc_version: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            role: DEFAULT_SERVER_ROLE.to_string(),
            version_attribute: VERSION_ATTRIBUTE.to_string(),
            min_rpc_version: RPC_BASELINE.to_string(),
        }
    }
}

impl GateConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.role.is_empty() {
            return Err(ConfigError::EmptyField("role"));
        }
        if self.version_attribute.is_empty() {
            return Err(ConfigError::EmptyField("version_attribute"));
        }
        self.threshold()?;
        Ok(())
    }

    /// Parsed RPC threshold
    pub fn threshold(&self) -> Result<VersionThreshold, ConfigError> {
        Ok(VersionThreshold::parse(&self.min_rpc_version)?)
    }

    /// Classifier for the configured server role
    pub fn classifier(&self) -> MemberClassifier {
        MemberClassifier::new(self.role.clone())
    }

    /// RPC gate using the configured threshold and attribute key
    pub fn rpc_gate(&self) -> Result<RpcGate, ConfigError> {
        Ok(RpcGate::new(self.threshold()?).with_version_attribute(self.version_attribute.clone()))
    }
}
