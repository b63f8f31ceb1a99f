//! Archive transfer
//!
//! Bundle locally, copy one file with `scp` over the session's control
//! socket, then stage and swap on the host.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{BuildArtifact, DeploymentDescriptor, TransferPlan};
use crate::domain::ports::{
    CommandRunner, CommandSpec, LogObserver, RemoteSession, TransferStrategy, TransportSpec,
};
use crate::domain::services::transfer_rules::ArchiveLayout;
use crate::domain::value_objects::TransferStrategyKind;
use crate::error::{RolloutError, RolloutResult};
use crate::infrastructure::ssh::CREDENTIAL_HELPER;

use super::bundle::{create_bundle, run_stamp, DEFAULT_COMPRESSION_LEVEL};

const COPY_PROGRAM: &str = "scp";

/// Compress-copy-extract transfer
pub struct ArchiveTransfer {
    runner: Arc<dyn CommandRunner>,
    compression_level: u32,
}

impl ArchiveTransfer {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    fn failure(message: impl Into<String>) -> RolloutError {
        RolloutError::Transfer {
            strategy: TransferStrategyKind::Archive.name(),
            message: message.into(),
        }
    }

    /// Run a short remote step, failing on non-zero exit
    fn remote_step(
        session: &mut dyn RemoteSession,
        step: &str,
        command: &str,
    ) -> RolloutResult<()> {
        debug!(step, "archive remote step");
        let output = session.capture(command)?;
        if !output.success() {
            let detail = output.stderr.trim();
            return Err(Self::failure(if detail.is_empty() {
                format!("{} exited with status {}", step, output.code)
            } else {
                format!("{}: {}", step, detail)
            }));
        }
        Ok(())
    }
}

/// `scp` invocation for `local` to `remote`, wrapped in the credential
/// helper when the transport carries a password
pub(super) fn copy_command(transport: &TransportSpec, local: &str, remote: &str) -> CommandSpec {
    let target = format!("{}:{}", transport.destination, remote);
    if transport.password.is_empty() {
        CommandSpec::new(COPY_PROGRAM)
            .args(transport.scp_args())
            .arg(local)
            .arg(target)
    } else {
        CommandSpec::new(CREDENTIAL_HELPER)
            .args(["-e", COPY_PROGRAM])
            .args(transport.scp_args())
            .arg(local)
            .arg(target)
            .secret_env("SSHPASS", transport.password.clone())
    }
}

impl TransferStrategy for ArchiveTransfer {
    fn kind(&self) -> TransferStrategyKind {
        TransferStrategyKind::Archive
    }

    fn is_available(&self) -> bool {
        self.runner.is_available(COPY_PROGRAM)
    }

    fn transfer(
        &self,
        artifact: &BuildArtifact,
        plan: &TransferPlan,
        descriptor: &DeploymentDescriptor,
        session: &mut dyn RemoteSession,
        observer: &dyn LogObserver,
    ) -> RolloutResult<()> {
        let stamp = run_stamp();
        let layout = ArchiveLayout::new(&descriptor.remote_path, &stamp);

        let bundle = create_bundle(artifact, &plan.sources, &stamp, self.compression_level)?;
        Self::remote_step(session, "prepare", &layout.prepare_command())?;

        let transport = session.transport();
        let local = bundle.path().to_string_lossy().into_owned();
        let copy = copy_command(&transport, &local, &layout.bundle);
        debug!(command = %copy.display(), "uploading bundle");
        let code = self
            .runner
            .run(&copy, observer)
            .map_err(|e| Self::failure(format!("could not start {}: {}", copy.program, e)))?;
        if code != 0 {
            return Err(Self::failure(format!(
                "{} exited with status {}",
                COPY_PROGRAM, code
            )));
        }
        drop(bundle);

        Self::remote_step(session, "extract", &layout.stage_command())?;
        Self::remote_step(session, "swap", &layout.swap_command(&plan.sources))?;

        info!(entries = plan.sources.len(), "archive placed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CommandOutput;
    use crate::domain::ports::DiscardObserver;
    use crate::domain::entities::ServerTarget;
    use crate::domain::value_objects::Secret;
    use std::fs;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<CommandSpec>>,
        code: i32,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, spec: &CommandSpec, _observer: &dyn LogObserver) -> RolloutResult<i32> {
            self.calls.lock().unwrap().push(spec.clone());
            Ok(self.code)
        }

        fn is_available(&self, _program: &str) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct RecordingSession {
        commands: Vec<String>,
        fail_on: Option<&'static str>,
        password: Secret,
    }

    impl RemoteSession for RecordingSession {
        fn exec(&mut self, command: &str, _observer: &dyn LogObserver) -> RolloutResult<i32> {
            self.commands.push(command.to_string());
            Ok(0)
        }

        fn capture(&mut self, command: &str) -> RolloutResult<CommandOutput> {
            self.commands.push(command.to_string());
            let failed = self.fail_on.map_or(false, |word| command.contains(word));
            Ok(CommandOutput {
                code: if failed { 2 } else { 0 },
                stdout: String::new(),
                stderr: if failed { "disk full".into() } else { String::new() },
            })
        }

        fn transport(&self) -> TransportSpec {
            TransportSpec {
                destination: "deploy@h".into(),
                port: 22,
                control_path: None,
                ssh_args: Vec::new(),
                password: self.password.clone(),
            }
        }

        fn close(&mut self) -> RolloutResult<()> {
            Ok(())
        }
    }

    fn project() -> (tempfile::TempDir, BuildArtifact) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".output/server")).unwrap();
        fs::write(dir.path().join(".output/server/index.mjs"), "").unwrap();
        let artifact = BuildArtifact::new(dir.path(), ".output");
        (dir, artifact)
    }

    fn descriptor() -> DeploymentDescriptor {
        DeploymentDescriptor::new(ServerTarget::new("h", "deploy"), "/srv/app", "shop")
    }

    #[test]
    fn uploads_then_extracts_then_swaps() {
        let (_dir, artifact) = project();
        let runner = Arc::new(RecordingRunner::default());
        let mut session = RecordingSession::default();
        let plan = TransferPlan::new(TransferStrategyKind::Archive, artifact.sources());

        ArchiveTransfer::new(runner.clone())
            .transfer(&artifact, &plan, &descriptor(), &mut session, &DiscardObserver)
            .unwrap();

        assert_eq!(session.commands.len(), 3);
        assert!(session.commands[0].starts_with("mkdir -p '/srv/app'"));
        assert!(session.commands[1].contains("tar -xzf"));
        assert!(session.commands[2].contains(".rollout-previous-"));
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].program, "scp");
        assert!(calls[0].args.last().unwrap().starts_with("deploy@h:/srv/app/rollout-"));
    }

    #[test]
    fn password_wraps_copy_in_credential_helper() {
        let transport = TransportSpec {
            destination: "u@h".into(),
            port: 2200,
            password: Secret::new("pw"),
            ..Default::default()
        };
        let spec = copy_command(&transport, "/tmp/b.tar.gz", "/srv/b.tar.gz");
        assert_eq!(spec.program, "sshpass");
        assert_eq!(&spec.args[0..4], ["-e", "scp", "-P", "2200"]);
        assert_eq!(spec.secret_env.len(), 1);
        assert!(!spec.display().contains("pw"));
    }

    #[test]
    fn failed_upload_never_touches_live_entries() {
        let (_dir, artifact) = project();
        let runner = Arc::new(RecordingRunner {
            code: 1,
            ..Default::default()
        });
        let mut session = RecordingSession::default();
        let plan = TransferPlan::new(TransferStrategyKind::Archive, artifact.sources());

        let err = ArchiveTransfer::new(runner)
            .transfer(&artifact, &plan, &descriptor(), &mut session, &DiscardObserver)
            .unwrap_err();

        assert_eq!(err.kind(), "transfer");
        assert_eq!(session.commands.len(), 1);
    }

    #[test]
    fn failed_extraction_reports_remote_detail() {
        let (_dir, artifact) = project();
        let mut session = RecordingSession {
            fail_on: Some("tar -xzf"),
            ..Default::default()
        };
        let plan = TransferPlan::new(TransferStrategyKind::Archive, artifact.sources());

        let err = ArchiveTransfer::new(Arc::new(RecordingRunner::default()))
            .transfer(&artifact, &plan, &descriptor(), &mut session, &DiscardObserver)
            .unwrap_err();

        assert!(err.to_string().contains("disk full"));
        assert!(!session.commands.iter().any(|c| c.contains(".rollout-previous-")));
    }
}
