//! Console progress for `rollout deploy`
//!
//! Renders deploy events as they arrive. Final summaries and errors are
//! rendered by the command once `execute` returns.

use std::io::{self, Write};
use std::sync::Mutex;

use rollout::domain::ports::{DeployEvent, DeployEventSink, LineSource};
use rollout::domain::value_objects::{Channel, DeployStage};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::blocks::warning::WarningLine;
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
    unicode: bool,
}

impl ConsoleEventSink {
    pub fn stdout(ui: &UiContext) -> Self {
        Self::with_writer(Box::new(io::stdout()), ui.color, ui.unicode)
    }

    pub fn with_writer(writer: Box<dyn Write + Send>, color: bool, unicode: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            color,
            unicode,
        }
    }

    fn icon(&self, icon: Icon) -> String {
        icon.colored(self.color, self.unicode)
    }

    fn render(&self, event: &DeployEvent) -> Option<String> {
        let text = match event {
            DeployEvent::Started {
                environment,
                destination,
                app,
            } => {
                let header = CommandHeader::new(Icon::Deploy, "Rollout Deploy")
                    .field("Environment", environment.as_str())
                    .field("Target", destination.as_str())
                    .field("App", app.as_str());
                format!("{}\n", header.render(self.color, self.unicode))
            }
            DeployEvent::StageChanged { stage } => {
                if stage.is_terminal() || *stage == DeployStage::Idle {
                    return None;
                }
                format!(
                    "{} {}\n",
                    self.icon(Icon::Progress),
                    ColoredText::plain(capitalize(stage.label()))
                        .bold()
                        .render(self.color)
                )
            }
            DeployEvent::Line { source, event } => {
                let line = match (source, event.channel) {
                    (LineSource::Remote, Channel::Out) => event.sanitized.clone(),
                    (LineSource::Remote, Channel::Err) => {
                        ColoredText::warning(event.sanitized.as_str()).render(self.color)
                    }
                    _ => ColoredText::dim(event.sanitized.as_str()).render(self.color),
                };
                format!("  {}\n", line)
            }
            DeployEvent::Connected { destination } => {
                format!("{} Connected to {}\n", self.icon(Icon::Remote), destination)
            }
            DeployEvent::ArtifactReady { dir, fingerprint } => {
                let name = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| dir.display().to_string());
                match fingerprint {
                    Some(fp) => format!(
                        "{} Artifact ready: {} {}\n",
                        self.icon(Icon::Success),
                        name,
                        ColoredText::dim(format!("(lock {})", short(fp))).render(self.color)
                    ),
                    None => format!("{} Artifact ready: {}\n", self.icon(Icon::Success), name),
                }
            }
            DeployEvent::TransferStarted { strategy } => format!(
                "  {} Transferring with {}\n",
                self.icon(Icon::Arrow),
                strategy.name()
            ),
            DeployEvent::TransferFallback { from, to, reason } => WarningLine::new(format!(
                "{} failed, falling back to {}",
                from.name(),
                to.name()
            ))
            .with_hint(reason.as_str())
            .render(self.color, self.unicode),
            DeployEvent::TransferCompleted { strategy } => format!(
                "{} Artifact placed ({})\n",
                self.icon(Icon::Success),
                strategy.name()
            ),
            DeployEvent::DependenciesChecked { should_install, .. } => {
                if *should_install {
                    format!(
                        "  {} Dependencies changed, installing on host\n",
                        self.icon(Icon::Arrow)
                    )
                } else {
                    format!(
                        "{} Dependencies unchanged, skipping remote install\n",
                        self.icon(Icon::Success)
                    )
                }
            }
            DeployEvent::Warning { message } => {
                WarningLine::new(message.as_str()).render(self.color, self.unicode)
            }
            DeployEvent::Completed { .. } => return None,
            DeployEvent::Failed { stage, message, .. } => format!(
                "{} {}: {}\n",
                self.icon(Icon::Error),
                ColoredText::error(format!("Failed while {}", stage.label()))
                    .bold()
                    .render(self.color),
                message
            ),
        };
        Some(text)
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let Some(text) = self.render(&event) else {
            return;
        };
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        let _ = writer.write_all(text.as_bytes());
        let _ = writer.flush();
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
