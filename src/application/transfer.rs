//! Transfer Planner
//!
//! Selects a transfer strategy for the run and executes it, downgrading to
//! the plan's fallback at most once.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{BuildArtifact, DeploymentDescriptor, TransferPlan};
use crate::domain::ports::{
    DeployEvent, DeployEventSink, LogObserver, RemoteSession, TransferStrategy,
};
use crate::domain::services::{select_strategy, ToolAvailability};
use crate::domain::value_objects::TransferStrategyKind;
use crate::error::{RolloutError, RolloutResult};

/// Transfer use case
pub struct TransferPlanner {
    strategies: Vec<Arc<dyn TransferStrategy>>,
    tools: ToolAvailability,
    prefer_delta: bool,
}

impl TransferPlanner {
    pub fn new(strategies: Vec<Arc<dyn TransferStrategy>>, tools: ToolAvailability) -> Self {
        Self {
            strategies,
            tools,
            prefer_delta: true,
        }
    }

    pub fn with_prefer_delta(mut self, prefer_delta: bool) -> Self {
        self.prefer_delta = prefer_delta;
        self
    }

    fn strategy(&self, kind: TransferStrategyKind) -> Option<&Arc<dyn TransferStrategy>> {
        self.strategies.iter().find(|s| s.kind() == kind)
    }

    /// Choose the strategy and sources for this artifact
    pub fn plan(&self, artifact: &BuildArtifact, descriptor: &DeploymentDescriptor) -> TransferPlan {
        let mut kind = select_strategy(
            self.tools,
            descriptor.server.has_password(),
            self.prefer_delta,
        );
        if self.strategy(kind).is_none() {
            kind = TransferStrategyKind::Archive;
        }
        debug!(strategy = %kind, tools = ?self.tools, "transfer plan");
        TransferPlan::new(kind, artifact.sources())
    }

    /// Run the plan; returns the strategy that placed the artifact
    pub fn execute(
        &self,
        plan: &TransferPlan,
        artifact: &BuildArtifact,
        descriptor: &DeploymentDescriptor,
        session: &mut dyn RemoteSession,
        observer: &dyn LogObserver,
        events: &dyn DeployEventSink,
    ) -> RolloutResult<TransferStrategyKind> {
        let primary = self.attempt(plan, artifact, descriptor, session, observer, events);
        let err = match primary {
            Ok(kind) => return Ok(kind),
            Err(err) => err,
        };

        let Some(fallback) = plan.fallback_plan() else {
            return Err(err);
        };
        warn!(from = %plan.strategy, to = %fallback.strategy, error = %err, "transfer fallback");
        events.on_event(DeployEvent::TransferFallback {
            from: plan.strategy,
            to: fallback.strategy,
            reason: err.to_string(),
        });
        self.attempt(&fallback, artifact, descriptor, session, observer, events)
    }

    fn attempt(
        &self,
        plan: &TransferPlan,
        artifact: &BuildArtifact,
        descriptor: &DeploymentDescriptor,
        session: &mut dyn RemoteSession,
        observer: &dyn LogObserver,
        events: &dyn DeployEventSink,
    ) -> RolloutResult<TransferStrategyKind> {
        let strategy = self
            .strategy(plan.strategy)
            .ok_or_else(|| RolloutError::Transfer {
                strategy: plan.strategy.name(),
                message: "no implementation registered".to_string(),
            })?;

        events.on_event(DeployEvent::TransferStarted {
            strategy: plan.strategy,
        });
        strategy.transfer(artifact, plan, descriptor, session, observer)?;
        events.on_event(DeployEvent::TransferCompleted {
            strategy: plan.strategy,
        });
        Ok(plan.strategy)
    }
}
