//! Delta-sync transfer
//!
//! `rsync` over the session's control socket. Only changed files travel;
//! `--delete-after` removes stale remote files once the new ones are in.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{BuildArtifact, DeploymentDescriptor, TransferPlan};
use crate::domain::ports::{
    CommandRunner, CommandSpec, LogObserver, RemoteSession, TransferStrategy, TransportSpec,
};
use crate::domain::services::shell::{join_remote, quote_path};
use crate::domain::value_objects::TransferStrategyKind;
use crate::error::{RolloutError, RolloutResult};
use crate::infrastructure::ssh::CREDENTIAL_HELPER;

const SYNC_PROGRAM: &str = "rsync";

const SYNC_FLAGS: [&str; 5] = [
    "-az",
    "--delete-after",
    "--no-perms",
    "--no-owner",
    "--no-group",
];

/// rsync-backed transfer
pub struct RsyncTransfer {
    runner: Arc<dyn CommandRunner>,
}

impl RsyncTransfer {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn failure(message: impl Into<String>) -> RolloutError {
        RolloutError::Transfer {
            strategy: TransferStrategyKind::DeltaSync.name(),
            message: message.into(),
        }
    }
}

/// rsync invocation for one source
///
/// Directories sync their contents (`src/` to `dst/`) so repeated runs
/// update in place instead of nesting.
pub(super) fn sync_command(
    transport: &TransportSpec,
    artifact: &BuildArtifact,
    source: &str,
    remote_path: &str,
) -> CommandSpec {
    let local = artifact.local_path(source);
    let remote = join_remote(remote_path, source);
    let (from, to) = if local.is_dir() {
        (format!("{}/", local.display()), format!("{}/", remote))
    } else {
        (local.display().to_string(), remote)
    };

    let base = if transport.password.is_empty() {
        CommandSpec::new(SYNC_PROGRAM)
    } else {
        CommandSpec::new(CREDENTIAL_HELPER)
            .args(["-e", SYNC_PROGRAM])
            .secret_env("SSHPASS", transport.password.clone())
    };
    base.args(SYNC_FLAGS)
        .arg("-e")
        .arg(transport.ssh_command())
        .arg(from)
        .arg(format!("{}:{}", transport.destination, to))
}

impl TransferStrategy for RsyncTransfer {
    fn kind(&self) -> TransferStrategyKind {
        TransferStrategyKind::DeltaSync
    }

    fn is_available(&self) -> bool {
        self.runner.is_available(SYNC_PROGRAM)
    }

    fn transfer(
        &self,
        artifact: &BuildArtifact,
        plan: &TransferPlan,
        descriptor: &DeploymentDescriptor,
        session: &mut dyn RemoteSession,
        observer: &dyn LogObserver,
    ) -> RolloutResult<()> {
        let prepare = session.capture(&format!("mkdir -p {}", quote_path(&descriptor.remote_path)))?;
        if !prepare.success() {
            return Err(Self::failure(format!(
                "could not create {}: {}",
                descriptor.remote_path,
                prepare.stderr.trim()
            )));
        }

        let transport = session.transport();
        for source in &plan.sources {
            let spec = sync_command(&transport, artifact, source, &descriptor.remote_path);
            debug!(source = %source, command = %spec.display(), "syncing");
            let code = self
                .runner
                .run(&spec, observer)
                .map_err(|e| Self::failure(format!("could not start {}: {}", spec.program, e)))?;
            if code != 0 {
                return Err(Self::failure(format!(
                    "{} exited with status {} while syncing {}",
                    SYNC_PROGRAM, code, source
                )));
            }
        }

        info!(entries = plan.sources.len(), "sync finished");
        Ok(())
    }
}
