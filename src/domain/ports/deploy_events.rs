//! Deploy Event Port
//!
//! Observable interface for deployment runs.
//! Drives the console progress view, the JSON event stream, and tests.

use std::path::PathBuf;

use crate::domain::value_objects::{DeployStage, LogEvent, TransferStrategyKind};

/// Where a streamed output line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSource {
    /// Local build subprocess
    Build,
    /// Transfer tool
    Transfer,
    /// Remote pipeline
    Remote,
}

impl LineSource {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Transfer => "transfer",
            Self::Remote => "remote",
        }
    }
}

/// Event emitted during a deployment run
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Run started
    Started {
        environment: String,
        destination: String,
        app: String,
    },

    /// Orchestrator entered a new stage
    StageChanged { stage: DeployStage },

    /// One sanitized output line
    Line { source: LineSource, event: LogEvent },

    /// Remote session established
    Connected { destination: String },

    /// Local build finished and the artifact was located
    ArtifactReady {
        dir: PathBuf,
        fingerprint: Option<String>,
    },

    /// Transfer attempt started
    TransferStarted { strategy: TransferStrategyKind },

    /// Primary strategy failed; the fallback runs next
    TransferFallback {
        from: TransferStrategyKind,
        to: TransferStrategyKind,
        reason: String,
    },

    /// Artifact placed on the remote host
    TransferCompleted { strategy: TransferStrategyKind },

    /// Dependency diff decision
    DependenciesChecked {
        should_install: bool,
        local: Option<String>,
        remote: Option<String>,
    },

    /// Non-fatal problem (e.g. a post-deploy command failed)
    Warning { message: String },

    /// Run succeeded
    Completed {
        url: String,
        strategy: TransferStrategyKind,
        installed: bool,
        elapsed_ms: u128,
    },

    /// Run failed; emitted exactly once per failed run
    Failed {
        stage: DeployStage,
        kind: &'static str,
        message: String,
    },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress display in terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants streamed output lines
    ///
    /// Summary-only sinks skip `Line` events.
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
