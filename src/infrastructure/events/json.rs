//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON record for one event
pub fn event_json(event: &DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Started {
            environment,
            destination,
            app,
        } => serde_json::json!({
            "event": "start",
            "command": "deploy",
            "environment": environment,
            "destination": destination,
            "app": app,
        }),

        DeployEvent::StageChanged { stage } => serde_json::json!({
            "event": "stage",
            "command": "deploy",
            "stage": stage,
        }),

        DeployEvent::Line { source, event } => serde_json::json!({
            "event": "line",
            "command": "deploy",
            "source": source.name(),
            "channel": event.channel,
            "text": event.sanitized,
        }),

        DeployEvent::Connected { destination } => serde_json::json!({
            "event": "connected",
            "command": "deploy",
            "destination": destination,
        }),

        DeployEvent::ArtifactReady { dir, fingerprint } => serde_json::json!({
            "event": "artifact_ready",
            "command": "deploy",
            "dir": dir.display().to_string(),
            "fingerprint": fingerprint,
        }),

        DeployEvent::TransferStarted { strategy } => serde_json::json!({
            "event": "transfer_start",
            "command": "deploy",
            "strategy": strategy.name(),
        }),

        DeployEvent::TransferFallback { from, to, reason } => serde_json::json!({
            "event": "transfer_fallback",
            "command": "deploy",
            "from": from.name(),
            "to": to.name(),
            "reason": reason,
        }),

        DeployEvent::TransferCompleted { strategy } => serde_json::json!({
            "event": "transfer_complete",
            "command": "deploy",
            "strategy": strategy.name(),
        }),

        DeployEvent::DependenciesChecked {
            should_install,
            local,
            remote,
        } => serde_json::json!({
            "event": "dependencies",
            "command": "deploy",
            "install": should_install,
            "local": local,
            "remote": remote,
        }),

        DeployEvent::Warning { message } => serde_json::json!({
            "event": "warning",
            "command": "deploy",
            "message": message,
        }),

        DeployEvent::Completed {
            url,
            strategy,
            installed,
            elapsed_ms,
        } => serde_json::json!({
            "event": "complete",
            "command": "deploy",
            "status": "success",
            "url": url,
            "strategy": strategy.name(),
            "installed": installed,
            "elapsed_ms": *elapsed_ms as u64,
        }),

        DeployEvent::Failed {
            stage,
            kind,
            message,
        } => serde_json::json!({
            "event": "complete",
            "command": "deploy",
            "status": "failed",
            "stage": stage,
            "kind": kind,
            "error": message,
        }),
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.write_event(event_json(&event));
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}
