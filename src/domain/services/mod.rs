//! Domain Services
//!
//! Pure deployment rules. No process spawning, no network.

pub mod ansi;
pub mod composer;
pub mod dependency_diff;
pub mod shell;
pub mod transfer_rules;

pub use composer::{compose, service_action, ServiceAction};
pub use dependency_diff::{should_install, ENV_FILE, MARKER_FILE};
pub use transfer_rules::{select_strategy, ArchiveLayout, ToolAvailability};
