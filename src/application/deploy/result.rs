//! Deploy Result

use std::time::Duration;

use crate::domain::value_objects::{DeployStage, Fingerprint, TransferStrategyKind};

/// Outcome of a successful deployment run
#[derive(Debug, Clone)]
pub struct DeployReport {
    /// Strategy that actually placed the artifact
    pub strategy: TransferStrategyKind,
    /// Whether the remote install ran
    pub installed: bool,
    /// Fingerprint now recorded on the host
    pub fingerprint: Option<Fingerprint>,
    /// Public URL of the app
    pub url: String,
    /// Post-deploy commands that failed (reported, never fatal)
    pub post_command_failures: Vec<String>,
    /// Stages visited, in order
    pub stages: Vec<DeployStage>,
    pub elapsed: Duration,
}

impl DeployReport {
    pub fn has_warnings(&self) -> bool {
        !self.post_command_failures.is_empty()
    }
}
