//! Configuration module for Rollout
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (ROLLOUT_*)
//! 3. Project config (.rollout/config.toml)
//! 4. User config (~/.config/rollout/config.toml)
//! 5. Built-in defaults (lowest priority)
//!
//! Deployment targets live in descriptor files, not here; see
//! `infrastructure::repositories`.

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::{apply_env_overrides, ConfigWarning, PROJECT_CONFIG, USER_CONFIG};
pub use types::{BuildConfig, ColorMode, Config, ConnectionConfig, OutputConfig, TransferConfig};
