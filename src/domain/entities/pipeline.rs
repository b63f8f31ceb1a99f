//! Command Pipeline Entity
//!
//! Ordered remote command fragments, rendered into one shell line where
//! every step is `&&`-chained. Fault-tolerant steps carry their own
//! fallback chain and always exit 0.

use std::fmt;

/// What a pipeline step does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Shell environment setup (PATH, profile files)
    Preamble,
    /// `cd` into the deployment directory
    ChangeDirectory,
    /// User-declared pre-command
    PreCommand,
    /// Dependency install
    Install,
    /// Native module rebuild with fallback chain
    Rebuild,
    /// Record the installed lock file digest
    RecordMarker,
    /// Export runtime variables from the env file
    LoadEnv,
    /// Supervisor reload/start or direct launch
    ServiceAction,
}

impl StepKind {
    /// Steps that never abort the pipeline on their own
    pub fn is_fault_tolerant(&self) -> bool {
        matches!(self, Self::Preamble | Self::Rebuild)
    }
}

/// One fragment of the remote pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStep {
    pub kind: StepKind,
    pub command: String,
}

impl PipelineStep {
    pub fn new(kind: StepKind, command: impl Into<String>) -> Self {
        Self {
            kind,
            command: command.into(),
        }
    }
}

/// Ordered remote command pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPipeline {
    steps: Vec<PipelineStep>,
}

impl CommandPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: StepKind, command: impl Into<String>) {
        self.steps.push(PipelineStep::new(kind, command));
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether any step of the given kind is present
    pub fn contains(&self, kind: StepKind) -> bool {
        self.steps.iter().any(|s| s.kind == kind)
    }

    /// Position of the first step of the given kind
    pub fn position(&self, kind: StepKind) -> Option<usize> {
        self.steps.iter().position(|s| s.kind == kind)
    }

    /// Insert a step right after the last step of kind `anchor`
    ///
    /// Returns false, leaving the pipeline unchanged, when no such step exists.
    pub fn insert_after(
        &mut self,
        anchor: StepKind,
        kind: StepKind,
        command: impl Into<String>,
    ) -> bool {
        match self.steps.iter().rposition(|s| s.kind == anchor) {
            Some(at) => {
                self.steps.insert(at + 1, PipelineStep::new(kind, command));
                true
            }
            None => false,
        }
    }

    /// Render as a single short-circuit shell command line
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .map(|s| s.command.as_str())
            .collect::<Vec<_>>()
            .join(" && ")
    }
}

impl fmt::Display for CommandPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
