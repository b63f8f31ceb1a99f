//! Dependency Differ
//!
//! Compares the local lock file fingerprint with the marker recorded on the
//! remote host. The marker is the only remote state this use case touches:
//! it is dropped before an install and rewritten by the pipeline once the
//! install has succeeded.

use std::path::Path;

use tracing::debug;

use crate::application::build::fingerprint_manifest;
use crate::domain::entities::{CommandPipeline, DeploymentDescriptor, StepKind};
use crate::domain::ports::RemoteSession;
use crate::domain::services::dependency_diff::{
    marker_write_command, read_marker_command, runtime_files_command,
};
use crate::domain::value_objects::Fingerprint;
use crate::error::{RolloutError, RolloutResult};

/// Dependency diff use case
#[derive(Debug, Default, Clone, Copy)]
pub struct DependencyDiffer;

impl DependencyDiffer {
    pub fn new() -> Self {
        Self
    }

    /// Content fingerprint of a local manifest; `None` if it is missing
    pub fn fingerprint(&self, manifest: &Path) -> RolloutResult<Option<Fingerprint>> {
        fingerprint_manifest(manifest)
    }

    /// Digest recorded on the remote host, if any
    pub fn remote_digest(
        &self,
        descriptor: &DeploymentDescriptor,
        session: &mut dyn RemoteSession,
    ) -> RolloutResult<Option<Fingerprint>> {
        let output = session.capture(&read_marker_command(descriptor))?;
        let digest = Fingerprint::parse_marker(&output.stdout);
        debug!(found = digest.is_some(), "remote dependency marker");
        Ok(digest)
    }

    pub fn should_install(&self, local: Option<&Fingerprint>, remote: Option<&Fingerprint>) -> bool {
        crate::domain::services::should_install(local, remote)
    }

    /// Write the runtime env file; drop the marker when an install follows
    ///
    /// Call only once the artifact has been placed.
    pub fn write_runtime_files(
        &self,
        descriptor: &DeploymentDescriptor,
        session: &mut dyn RemoteSession,
        install: bool,
    ) -> RolloutResult<()> {
        let output = session.capture(&runtime_files_command(descriptor, install))?;
        if !output.success() {
            return Err(RolloutError::RemoteCommand { code: output.code });
        }
        Ok(())
    }

    /// Append the marker write behind the install steps of `pipeline`
    ///
    /// Returns whether a marker step was added; without a local digest or
    /// an install step there is nothing to record.
    pub fn record_in_pipeline(
        &self,
        pipeline: &mut CommandPipeline,
        descriptor: &DeploymentDescriptor,
        local: Option<&Fingerprint>,
    ) -> bool {
        let Some(digest) = local else {
            return false;
        };
        pipeline.insert_after(
            StepKind::Rebuild,
            StepKind::RecordMarker,
            marker_write_command(descriptor, digest),
        )
    }
}
