//! Build Runner
//!
//! Runs the local dependency install and build, then locates and prepares
//! the artifact for transfer.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{
    BuildArtifact, DeploymentDescriptor, ARTIFACT_CANDIDATES, DECLARED_SOURCES, MANIFEST_FILE,
};
use crate::domain::ports::{CommandRunner, CommandSpec, LogObserver};
use crate::domain::value_objects::{Fingerprint, PackageManager};
use crate::error::{RolloutError, RolloutResult};

/// Dependency cache purged before a clean install
const DEPENDENCY_CACHE: &str = "node_modules";

/// Native addons bundled into the server output
const BUNDLED_NATIVE_DIR: &str = "server/node_modules";

/// Local build use case
pub struct BuildRunner {
    runner: Arc<dyn CommandRunner>,
    package_manager: PackageManager,
}

impl BuildRunner {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            package_manager: PackageManager::default(),
        }
    }

    pub fn with_package_manager(mut self, package_manager: PackageManager) -> Self {
        self.package_manager = package_manager;
        self
    }

    /// Install, build, and locate the artifact under `project_root`
    pub fn run(
        &self,
        descriptor: &DeploymentDescriptor,
        project_root: &Path,
        observer: &dyn LogObserver,
    ) -> RolloutResult<BuildArtifact> {
        self.install(descriptor, project_root, observer)?;

        let build = CommandSpec::new(self.package_manager.program())
            .args(self.package_manager.build_args())
            .current_dir(project_root)
            .envs(descriptor.build_env());
        self.run_step("build", &build, observer)?;

        let dir_name = probe_artifact(project_root)?;
        strip_native_modules(&project_root.join(dir_name))?;

        let mut artifact = BuildArtifact::new(project_root, dir_name)
            .with_extra_sources(declared_sources(project_root));
        if let Some(fingerprint) = fingerprint_manifest(&project_root.join(MANIFEST_FILE))? {
            debug!(fingerprint = fingerprint.short(), "manifest fingerprint");
            artifact = artifact.with_fingerprint(fingerprint);
        }

        info!(artifact = dir_name, "build finished");
        Ok(artifact)
    }

    fn install(
        &self,
        descriptor: &DeploymentDescriptor,
        project_root: &Path,
        observer: &dyn LogObserver,
    ) -> RolloutResult<()> {
        let args = if descriptor.optimize_install {
            self.package_manager.incremental_install_args()
        } else {
            let cache = project_root.join(DEPENDENCY_CACHE);
            if cache.exists() {
                debug!(path = %cache.display(), "purging dependency cache");
                fs::remove_dir_all(&cache)?;
            }
            let has_lock = project_root.join(MANIFEST_FILE).is_file();
            self.package_manager.clean_install_args(has_lock)
        };

        let spec = CommandSpec::new(self.package_manager.program())
            .args(args)
            .current_dir(project_root);
        self.run_step("install", &spec, observer)
    }

    fn run_step(
        &self,
        step: &str,
        spec: &CommandSpec,
        observer: &dyn LogObserver,
    ) -> RolloutResult<()> {
        debug!(step, command = %spec.display(), "running build step");
        let code = self
            .runner
            .run(spec, observer)
            .map_err(|e| match e {
                RolloutError::Io(io) => RolloutError::Build {
                    step: step.to_string(),
                    message: format!("could not start `{}`: {}", spec.program, io),
                },
                other => other,
            })?;
        if code != 0 {
            return Err(RolloutError::Build {
                step: step.to_string(),
                message: format!("`{}` exited with status {}", spec.display(), code),
            });
        }
        Ok(())
    }
}

/// First conventional artifact directory that exists
pub fn probe_artifact(project_root: &Path) -> RolloutResult<&'static str> {
    ARTIFACT_CANDIDATES
        .iter()
        .copied()
        .find(|name| project_root.join(name).is_dir())
        .ok_or_else(|| RolloutError::ArtifactNotFound {
            candidates: ARTIFACT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        })
}

/// Remove locally compiled native addons from the artifact
fn strip_native_modules(artifact_dir: &Path) -> RolloutResult<()> {
    let bundled = artifact_dir.join(BUNDLED_NATIVE_DIR);
    if bundled.is_dir() {
        debug!(path = %bundled.display(), "stripping bundled native modules");
        fs::remove_dir_all(&bundled)?;
    }
    Ok(())
}

/// Declared sources present in the project, in declaration order
fn declared_sources(project_root: &Path) -> Vec<String> {
    DECLARED_SOURCES
        .iter()
        .filter(|name| project_root.join(name).exists())
        .map(|name| name.to_string())
        .collect()
}

/// Fingerprint of the lock file, `None` when it does not exist
pub fn fingerprint_manifest(path: &Path) -> RolloutResult<Option<Fingerprint>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(Fingerprint::of_bytes(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
