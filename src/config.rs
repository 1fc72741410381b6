//! Signature build configuration
//!
//! Controls the checks run once, when a signature is built. Per-call
//! validation has no tunables.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Signature build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Deepest composite nesting a slot may declare (default: 16)
    #[serde(default = "default_max_constraint_depth")]
    pub max_constraint_depth: usize,

    /// Check declared defaults against their own slot (default: true)
    #[serde(default = "default_check_defaults")]
    pub check_defaults: bool,
}

fn default_max_constraint_depth() -> usize {
    16
}

fn default_check_defaults() -> bool {
    true
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            max_constraint_depth: default_max_constraint_depth(),
            check_defaults: default_check_defaults(),
        }
    }
}

impl SignatureConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Create a config with the given nesting bound
    pub fn with_max_depth(max_constraint_depth: usize) -> Self {
        Self {
            max_constraint_depth,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_constraint_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_constraint_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
