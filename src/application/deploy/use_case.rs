//! Deployment Orchestrator
//!
//! Sequences one run:
//! 1. Build locally while the remote session is established
//! 2. Join both at a single barrier
//! 3. Transfer the artifact (one-shot strategy fallback)
//! 4. Diff dependencies and write the env file
//! 5. Execute the composed remote pipeline, which records the marker after
//!    a successful install
//! 6. Run post-deploy commands and close the session
//!
//! Any stage error moves the run straight to `Failed`, closes the session
//! if it is open, and emits exactly one failure event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::build::BuildRunner;
use crate::application::connection::ConnectionManager;
use crate::application::dependencies::DependencyDiffer;
use crate::application::observer::EventLineObserver;
use crate::application::transfer::TransferPlanner;
use crate::domain::entities::DeploymentDescriptor;
use crate::domain::ports::{DeployEvent, DeployEventSink, LineSource, RemoteSession, SecretCipher};
use crate::domain::services::composer::{compose, compose_post_command};
use crate::domain::value_objects::{DeployStage, Secret};
use crate::error::{RolloutError, RolloutResult};

use super::options::DeployOptions;
use super::result::DeployReport;

/// Clears the active flag when a run ends, however it ends
struct ActiveRun<'a>(&'a AtomicBool);

impl<'a> ActiveRun<'a> {
    fn acquire(flag: &'a AtomicBool) -> RolloutResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RolloutError::RunInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Stage bookkeeping for one run
struct RunState {
    stage: DeployStage,
    visited: Vec<DeployStage>,
    events: Arc<dyn DeployEventSink>,
}

impl RunState {
    fn new(events: Arc<dyn DeployEventSink>) -> Self {
        Self {
            stage: DeployStage::Idle,
            visited: vec![DeployStage::Idle],
            events,
        }
    }

    fn advance(&mut self, to: DeployStage) {
        debug_assert!(
            self.stage.can_transition_to(to),
            "illegal transition {} -> {}",
            self.stage,
            to
        );
        debug!(from = %self.stage, to = %to, "stage transition");
        self.stage = to;
        self.visited.push(to);
        self.events.on_event(DeployEvent::StageChanged { stage: to });
    }
}

/// Top-level deployment use case
///
/// Holds at most one run at a time; a concurrent `execute` call on the same
/// instance is refused with `RunInProgress`.
pub struct DeploymentOrchestrator {
    build: BuildRunner,
    connection: ConnectionManager,
    planner: TransferPlanner,
    differ: DependencyDiffer,
    cipher: Arc<dyn SecretCipher>,
    active: AtomicBool,
}

impl DeploymentOrchestrator {
    pub fn new(
        build: BuildRunner,
        connection: ConnectionManager,
        planner: TransferPlanner,
        differ: DependencyDiffer,
        cipher: Arc<dyn SecretCipher>,
    ) -> Self {
        Self {
            build,
            connection,
            planner,
            differ,
            cipher,
            active: AtomicBool::new(false),
        }
    }

    /// Whether a run is in flight on this instance
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Execute one deployment run
    pub fn execute(
        &self,
        descriptor: &DeploymentDescriptor,
        options: &DeployOptions,
        events: Arc<dyn DeployEventSink>,
    ) -> RolloutResult<DeployReport> {
        let _active = ActiveRun::acquire(&self.active)?;
        let started = Instant::now();

        events.on_event(DeployEvent::Started {
            environment: descriptor.environment.clone(),
            destination: format!(
                "{}:{}",
                descriptor.server.destination(),
                descriptor.remote_path
            ),
            app: descriptor.app_name.clone(),
        });

        let mut run = RunState::new(Arc::clone(&events));
        let mut session: Option<Box<dyn RemoteSession>> = None;
        let outcome = self.run_stages(descriptor, options, &mut run, &mut session);

        if let Some(mut open) = session.take() {
            if let Err(e) = open.close() {
                warn!(error = %e, "closing remote session failed");
            }
        }

        match outcome {
            Ok(mut report) => {
                run.advance(DeployStage::Succeeded);
                report.stages = run.visited;
                report.elapsed = started.elapsed();
                info!(url = %report.url, strategy = %report.strategy, "deployment succeeded");
                events.on_event(DeployEvent::Completed {
                    url: report.url.clone(),
                    strategy: report.strategy,
                    installed: report.installed,
                    elapsed_ms: report.elapsed.as_millis(),
                });
                Ok(report)
            }
            Err(err) => {
                let failed_in = run.stage;
                if failed_in != DeployStage::Idle {
                    run.advance(DeployStage::Failed);
                }
                debug!(stage = %failed_in, error = %err, "deployment failed");
                events.on_event(DeployEvent::Failed {
                    stage: failed_in,
                    kind: err.kind(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn run_stages(
        &self,
        descriptor: &DeploymentDescriptor,
        options: &DeployOptions,
        run: &mut RunState,
        session_slot: &mut Option<Box<dyn RemoteSession>>,
    ) -> RolloutResult<DeployReport> {
        let events = Arc::clone(&run.events);

        // Build and connect in parallel, joined before anything remote
        run.advance(DeployStage::BuildingAndConnecting);
        let password = self.decrypt_password(descriptor);
        let pending = self.connection.connect_async(descriptor, password);
        let build_observer = EventLineObserver::new(Arc::clone(&events), LineSource::Build);
        let built = self
            .build
            .run(descriptor, &options.project_root, &build_observer);
        let connected = match pending.join() {
            Ok(opened) => Ok(&mut **session_slot.insert(opened)),
            Err(e) => Err(e),
        };
        let artifact = built?;
        let session = connected?;
        events.on_event(DeployEvent::Connected {
            destination: descriptor.server.destination(),
        });
        events.on_event(DeployEvent::ArtifactReady {
            dir: artifact.dir(),
            fingerprint: artifact.fingerprint.as_ref().map(|f| f.to_string()),
        });

        // Place the artifact
        run.advance(DeployStage::Transferring);
        let plan = self.planner.plan(&artifact, descriptor);
        let transfer_observer = EventLineObserver::new(Arc::clone(&events), LineSource::Transfer);
        let strategy = self.planner.execute(
            &plan,
            &artifact,
            descriptor,
            session,
            &transfer_observer,
            events.as_ref(),
        )?;

        // Decide on install; a stale marker goes before the install starts
        run.advance(DeployStage::DiffingDependencies);
        let local = artifact.fingerprint.clone();
        let remote = self.differ.remote_digest(descriptor, session)?;
        let install = self.differ.should_install(local.as_ref(), remote.as_ref());
        events.on_event(DeployEvent::DependenciesChecked {
            should_install: install,
            local: local.as_ref().map(|f| f.to_string()),
            remote: remote.as_ref().map(|f| f.to_string()),
        });
        self.differ.write_runtime_files(descriptor, session, install)?;

        // Remote pipeline
        run.advance(DeployStage::ExecutingRemote);
        let mut pipeline = compose(descriptor, install);
        let records = self
            .differ
            .record_in_pipeline(&mut pipeline, descriptor, local.as_ref());
        debug!(steps = pipeline.len(), install, records, "executing remote pipeline");
        let remote_observer = EventLineObserver::new(Arc::clone(&events), LineSource::Remote);
        let code = session.exec(&pipeline.render(), &remote_observer)?;
        if code != 0 {
            return Err(RolloutError::RemoteCommand { code });
        }

        // Post-deploy commands, then close
        run.advance(DeployStage::Finalizing);
        let post_command_failures = if options.run_post_commands {
            self.run_post_commands(descriptor, session, &remote_observer, events.as_ref())
        } else {
            Vec::new()
        };
        if let Some(mut open) = session_slot.take() {
            if let Err(e) = open.close() {
                warn!(error = %e, "closing remote session failed");
            }
        }

        Ok(DeployReport {
            strategy,
            installed: install,
            fingerprint: local,
            url: descriptor.app_url(),
            post_command_failures,
            stages: Vec::new(),
            elapsed: Default::default(),
        })
    }

    fn decrypt_password(&self, descriptor: &DeploymentDescriptor) -> Secret {
        if descriptor.server.has_password() {
            self.cipher.decrypt(&descriptor.server.encrypted_password)
        } else {
            Secret::empty()
        }
    }

    fn run_post_commands(
        &self,
        descriptor: &DeploymentDescriptor,
        session: &mut dyn RemoteSession,
        observer: &EventLineObserver,
        events: &dyn DeployEventSink,
    ) -> Vec<String> {
        let mut failures = Vec::new();
        for command in &descriptor.post_commands {
            let pipeline = compose_post_command(descriptor, command);
            let message = match session.exec(&pipeline.render(), observer) {
                Ok(0) => continue,
                Ok(code) => format!("post-deploy command `{}` exited with status {}", command, code),
                Err(e) => format!("post-deploy command `{}` failed: {}", command, e),
            };
            debug!("{}", message);
            events.on_event(DeployEvent::Warning {
                message: message.clone(),
            });
            failures.push(command.clone());
        }
        failures
    }
}
