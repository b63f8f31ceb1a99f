//! Rollout - build, ship and restart web applications over SSH
//!
//! Rollout builds a Node web application locally while it opens an SSH
//! session to the target host, transfers the build output (delta-sync with
//! an archive fallback), installs remote dependencies only when the lock
//! file changed, and reloads or starts the app under its process
//! supervisor.
//!
//! ## Layers
//!
//! - `domain` - Entities, rules and ports; no I/O
//! - `application` - Use cases (build, connect, transfer, orchestrate)
//! - `infrastructure` - SSH, rsync, archive, vault, descriptor files
//! - `config` - Layered TOML tool configuration
//! - `presentation` - CLI definition and dependency wiring

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployOptions, DeployReport, DeploymentOrchestrator};
pub use config::Config;
pub use domain::entities::{DeploymentDescriptor, ServerTarget};
pub use domain::services::ansi::sanitize;
pub use error::{RolloutError, RolloutResult};
