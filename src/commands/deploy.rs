//! `rollout deploy`

use std::sync::Arc;

use anyhow::Result;
use rollout::domain::ports::DeployEventSink;
use rollout::infrastructure::{JsonEventSink, RunLock};
use rollout::presentation::{create_orchestrator, TargetArgs};
use rollout::{DeployOptions, RolloutError};
use tracing::debug;

use super::{CommandContext, GlobalFlags, Reported};
use crate::ui::console_sink::ConsoleEventSink;
use crate::ui::views::deploy::render_deploy_summary;

pub fn cmd_deploy(flags: GlobalFlags, target: &TargetArgs, skip_post: bool) -> Result<()> {
    let ctx = CommandContext::load(flags)?;
    let descriptor = ctx.descriptor(target)?;

    let lock = RunLock::acquire(&ctx.project_root)?;
    debug!(lock = %lock.path().display(), "holding project lock");

    let sink: Arc<dyn DeployEventSink> = if ctx.ui.json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stdout(&ctx.ui))
    };

    let options = DeployOptions::new(&ctx.project_root).with_post_commands(!skip_post);
    let orchestrator = create_orchestrator(&ctx.config);
    let report = orchestrator
        .execute(&descriptor, &options, sink)
        .map_err(|err| match err {
            // Refused before the run started; nothing was rendered yet
            RolloutError::RunInProgress => anyhow::Error::from(err),
            other => Reported(other).into(),
        })?;

    if !ctx.ui.json {
        print!(
            "\n{}",
            render_deploy_summary(&report, ctx.ui.color, ctx.ui.unicode)
        );
    }
    Ok(())
}
