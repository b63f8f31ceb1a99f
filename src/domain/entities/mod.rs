//! Domain Entities
//!
//! - `DeploymentDescriptor` - Where and how to deploy, fixed for one run
//! - `BuildArtifact` - The local build output and its manifest fingerprint
//! - `TransferPlan` - Chosen transfer strategy and ordered sources
//! - `CommandPipeline` - Ordered remote command fragments

mod artifact;
mod descriptor;
mod pipeline;
mod transfer_plan;

pub use artifact::{BuildArtifact, ARTIFACT_CANDIDATES, DECLARED_SOURCES, MANIFEST_FILE};
pub use descriptor::{
    DeploymentDescriptor, ServerTarget, DEFAULT_APP_PORT, DEFAULT_BUILD_PROFILE,
    DEFAULT_ENTRY_POINT, DEFAULT_SSH_PORT,
};
pub use pipeline::{CommandPipeline, PipelineStep, StepKind};
pub use transfer_plan::TransferPlan;
