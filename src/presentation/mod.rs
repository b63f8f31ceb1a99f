//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//!
//! ## Usage
//!
//! ```ignore
//! use rollout::config::Config;
//! use rollout::presentation::factory;
//!
//! let orchestrator = factory::create_orchestrator(&Config::default());
//! ```

pub mod cli;
pub mod factory;

pub use cli::{Cli, ColorWhen, Commands, TargetArgs};
pub use factory::create_orchestrator;
