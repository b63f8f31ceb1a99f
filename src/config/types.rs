//! Configuration type definitions

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PackageManager;
use crate::error::RolloutResult;

use super::loader::{self, ConfigWarning};

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Seconds to wait for the remote session
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Value for ssh `StrictHostKeyChecking`
    #[serde(default = "default_host_key_checking")]
    pub strict_host_key_checking: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            strict_host_key_checking: default_host_key_checking(),
        }
    }
}

impl ConnectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_host_key_checking() -> String {
    "accept-new".to_string()
}

/// Local build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BuildConfig {
    #[serde(default)]
    pub package_manager: PackageManager,
}

/// Transfer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Use delta-sync when the tools allow it
    #[serde(default = "default_true")]
    pub prefer_delta: bool,

    /// gzip level for archive bundles (0-9)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            prefer_delta: true,
            compression_level: default_compression_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_compression_level() -> u32 {
    1
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub transfer: TransferConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a single TOML file
    pub fn load(path: &Path) -> RolloutResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> RolloutResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Layer user config, project config, and `ROLLOUT_*` variables
    pub fn load_layered(project_root: &Path) -> RolloutResult<(Self, Vec<ConfigWarning>)> {
        loader::load_layered(project_root)
    }

    /// Apply environment variable overrides (ROLLOUT_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}
