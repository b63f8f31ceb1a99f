//! Log line value object
//!
//! One line of output from a local subprocess or the remote session.

use serde::Serialize;

use crate::domain::services::ansi::sanitize;

/// Output channel a line was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Out,
    Err,
}

impl Channel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Out => "out",
            Self::Err => "err",
        }
    }
}

/// A single line of output, raw and sanitized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub channel: Channel,
    pub raw: String,
    pub sanitized: String,
}

impl LogEvent {
    /// Build an event, sanitizing the raw line
    pub fn new(channel: Channel, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let sanitized = sanitize(&raw);
        Self {
            channel,
            raw,
            sanitized,
        }
    }

    /// Whether the sanitized line has any visible content
    pub fn is_blank(&self) -> bool {
        self.sanitized.trim().is_empty()
    }
}
