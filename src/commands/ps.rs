//! `rollout ps`

use anyhow::Result;
use rollout::application::ProcessStatusQuery;
use rollout::presentation::factory::{create_cipher, create_connection_manager};
use rollout::presentation::TargetArgs;
use tracing::warn;

use super::{CommandContext, GlobalFlags};
use crate::ui::json;
use crate::ui::views::ps::render_process_table;

pub fn cmd_ps(flags: GlobalFlags, target: &TargetArgs) -> Result<()> {
    let ctx = CommandContext::load(flags)?;
    let descriptor = ctx.descriptor(target)?;

    let password = create_cipher().decrypt(&descriptor.server.encrypted_password);
    let mut session = create_connection_manager(&ctx.config).connect(&descriptor, &password)?;
    let result = ProcessStatusQuery.execute(session.as_mut());
    if let Err(e) = session.close() {
        warn!(error = %e, "closing remote session failed");
    }
    let processes = result?;

    if ctx.ui.json {
        json::emit(serde_json::json!({
            "event": "processes",
            "command": "ps",
            "host": descriptor.server.host,
            "processes": processes,
        }));
    } else {
        print!("{}", render_process_table(&processes, ctx.ui.color));
    }
    Ok(())
}
