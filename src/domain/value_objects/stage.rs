//! Deployment Stage
//!
//! States of a single orchestrated run.

use std::fmt;

use serde::Serialize;

/// Stage of a deployment run
///
/// ```text
/// Idle -> BuildingAndConnecting -> Transferring -> DiffingDependencies
///      -> ExecutingRemote -> Finalizing -> Succeeded
/// any non-terminal stage -> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    Idle,
    BuildingAndConnecting,
    Transferring,
    DiffingDependencies,
    ExecutingRemote,
    Finalizing,
    Succeeded,
    Failed,
}

impl DeployStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// The stage that follows on success, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::BuildingAndConnecting),
            Self::BuildingAndConnecting => Some(Self::Transferring),
            Self::Transferring => Some(Self::DiffingDependencies),
            Self::DiffingDependencies => Some(Self::ExecutingRemote),
            Self::ExecutingRemote => Some(Self::Finalizing),
            Self::Finalizing => Some(Self::Succeeded),
            Self::Succeeded | Self::Failed => None,
        }
    }

    /// Whether moving from `self` to `to` is a legal transition
    pub fn can_transition_to(&self, to: DeployStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        if to == Self::Failed {
            return *self != Self::Idle;
        }
        self.next() == Some(to)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::BuildingAndConnecting => "building and connecting",
            Self::Transferring => "transferring",
            Self::DiffingDependencies => "diffing dependencies",
            Self::ExecutingRemote => "executing remote pipeline",
            Self::Finalizing => "finalizing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_linear() {
        let mut stage = DeployStage::Idle;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            assert!(stage.can_transition_to(next));
            stage = next;
            visited.push(stage);
        }
        assert_eq!(stage, DeployStage::Succeeded);
        assert_eq!(visited.len(), 7);
    }

    #[test]
    fn any_active_stage_can_fail() {
        for stage in [
            DeployStage::BuildingAndConnecting,
            DeployStage::Transferring,
            DeployStage::DiffingDependencies,
            DeployStage::ExecutingRemote,
            DeployStage::Finalizing,
        ] {
            assert!(stage.can_transition_to(DeployStage::Failed));
        }
    }

    #[test]
    fn terminal_stages_do_not_move() {
        assert!(!DeployStage::Succeeded.can_transition_to(DeployStage::Failed));
        assert!(!DeployStage::Failed.can_transition_to(DeployStage::Idle));
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(!DeployStage::Transferring.can_transition_to(DeployStage::ExecutingRemote));
        assert!(!DeployStage::Idle.can_transition_to(DeployStage::Failed));
    }
}
