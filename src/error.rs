//! Error types for Rollout
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Rollout operations
pub type RolloutResult<T> = Result<T, RolloutError>;

/// Main error type for Rollout operations
#[derive(Error, Debug)]
pub enum RolloutError {
    /// Remote session could not be established (auth or network)
    #[error("connection to {destination} failed: {message}")]
    Connection {
        destination: String,
        message: String,
    },

    /// Build finished but none of the conventional output directories exist
    #[error("build produced no artifact directory (looked for {})", candidates.join(", "))]
    ArtifactNotFound { candidates: Vec<String> },

    /// A local build step exited non-zero or could not be spawned
    #[error("build step '{step}' failed: {message}")]
    Build { step: String, message: String },

    /// Sync or archive transfer failed and no fallback remains
    #[error("{strategy} transfer failed: {message}")]
    Transfer {
        strategy: &'static str,
        message: String,
    },

    /// The composed remote pipeline exited non-zero
    #[error("remote pipeline exited with status {code}")]
    RemoteCommand { code: i32 },

    /// Stored secret could not be decrypted on this machine
    #[error("stored credential could not be decrypted for this machine and user")]
    Credential,

    /// The orchestrator is already executing a run
    #[error("a deployment is already running")]
    RunInProgress,

    /// No descriptor file found in the project
    #[error("no deployment descriptor found in {dir} (run `rollout init`)")]
    DescriptorNotFound { dir: PathBuf },

    /// Several descriptor files exist and none was selected
    #[error("several deployment descriptors found ({}); pick one with --env", names.join(", "))]
    AmbiguousDescriptor { names: Vec<String> },

    /// Descriptor exists but is missing required fields
    #[error("invalid deployment descriptor {file}: {message}")]
    InvalidDescriptor { file: PathBuf, message: String },

    /// Tool configuration could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RolloutError {
    /// Short machine-readable kind, used by the JSON event stream
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "connection",
            Self::ArtifactNotFound { .. } => "artifact_not_found",
            Self::Build { .. } => "build",
            Self::Transfer { .. } => "transfer",
            Self::RemoteCommand { .. } => "remote_command",
            Self::Credential => "credential",
            Self::RunInProgress => "run_in_progress",
            Self::DescriptorNotFound { .. } => "descriptor_not_found",
            Self::AmbiguousDescriptor { .. } => "ambiguous_descriptor",
            Self::InvalidDescriptor { .. } => "invalid_descriptor",
            Self::Config { .. } => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_artifact_not_found() {
        let err = RolloutError::ArtifactNotFound {
            candidates: vec![".output".to_string(), ".nuxt".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "build produced no artifact directory (looked for .output, .nuxt)"
        );
    }

    #[test]
    fn test_error_display_remote_command() {
        let err = RolloutError::RemoteCommand { code: 127 };
        assert_eq!(err.to_string(), "remote pipeline exited with status 127");
    }

    #[test]
    fn test_error_display_ambiguous_descriptor() {
        let err = RolloutError::AmbiguousDescriptor {
            names: vec!["production".to_string(), "staging".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "several deployment descriptors found (production, staging); pick one with --env"
        );
    }

    #[test]
    fn kind_is_stable_for_json_consumers() {
        assert_eq!(RolloutError::Credential.kind(), "credential");
        assert_eq!(RolloutError::RemoteCommand { code: 1 }.kind(), "remote_command");
    }
}
