//! `rollout logs`

use std::io::Write;

use anyhow::Result;
use rollout::application::RemoteLogsQuery;
use rollout::domain::ports::LogObserver;
use rollout::domain::value_objects::LogEvent;
use rollout::presentation::factory::{create_cipher, create_connection_manager};
use rollout::presentation::TargetArgs;
use tracing::{debug, warn};

use super::{CommandContext, GlobalFlags};
use crate::ui::json;

/// Prints each sanitized remote line as it arrives
struct PrintObserver {
    json: bool,
}

impl LogObserver for PrintObserver {
    fn on_line(&self, event: LogEvent) {
        if event.is_blank() {
            return;
        }
        if self.json {
            json::emit(serde_json::json!({
                "event": "line",
                "command": "logs",
                "channel": event.channel.name(),
                "text": event.sanitized,
            }));
            return;
        }
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", event.sanitized);
    }
}

pub fn cmd_logs(flags: GlobalFlags, target: &TargetArgs, query: &RemoteLogsQuery) -> Result<()> {
    let ctx = CommandContext::load(flags)?;
    let descriptor = ctx.descriptor(target)?;

    let password = create_cipher().decrypt(&descriptor.server.encrypted_password);
    let mut session = create_connection_manager(&ctx.config).connect(&descriptor, &password)?;
    debug!(process = query.process_name(&descriptor), "connected for logs");
    let observer = PrintObserver { json: ctx.ui.json };
    let result = query.execute(&descriptor, session.as_mut(), &observer);
    if let Err(e) = session.close() {
        warn!(error = %e, "closing remote session failed");
    }
    Ok(result?)
}
