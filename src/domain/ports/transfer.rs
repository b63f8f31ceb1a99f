//! Transfer Strategy Port
//!
//! Moves the build artifact and its declared sources to the remote
//! deployment directory.

use crate::domain::entities::{BuildArtifact, DeploymentDescriptor, TransferPlan};
use crate::domain::ports::{LogObserver, RemoteSession};
use crate::domain::value_objects::TransferStrategyKind;
use crate::error::RolloutResult;

/// Strategy for transferring the artifact to the remote host
pub trait TransferStrategy: Send + Sync {
    /// Tag of this strategy
    fn kind(&self) -> TransferStrategyKind;

    /// Get the name of this transfer method (for logging)
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check if the local tools this method needs are installed
    fn is_available(&self) -> bool;

    /// Place every source of `plan` under the descriptor's remote path
    ///
    /// Must not delete live remote entries before their replacement is
    /// present on the host.
    fn transfer(
        &self,
        artifact: &BuildArtifact,
        plan: &TransferPlan,
        descriptor: &DeploymentDescriptor,
        session: &mut dyn RemoteSession,
        observer: &dyn LogObserver,
    ) -> RolloutResult<()>;
}
