//! Deploy Module
//!
//! Orchestrates one deployment run.
//!
//! ## Structure
//!
//! - `options` - Run configuration (`DeployOptions`)
//! - `result` - Run outcome (`DeployReport`)
//! - `use_case` - The stage machine (`DeploymentOrchestrator`)
//!
//! ## Usage
//!
//! ```ignore
//! use rollout::application::deploy::{DeployOptions, DeploymentOrchestrator};
//!
//! let orchestrator = DeploymentOrchestrator::new(build, connection, planner, differ, cipher);
//! let report = orchestrator.execute(&descriptor, &DeployOptions::new(root), events)?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::DeployReport;
pub use use_case::DeploymentOrchestrator;
