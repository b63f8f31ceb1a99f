//! OpenSSH client options shared by the connector and its sessions

use std::time::Duration;

use crate::domain::entities::DeploymentDescriptor;

/// Default bound on connection establishment
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-side SSH settings from the tool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshSettings {
    pub connect_timeout: Duration,
    /// Value for `StrictHostKeyChecking` (`yes`, `accept-new`, `no`)
    pub strict_host_key_checking: String,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            strict_host_key_checking: "accept-new".to_string(),
        }
    }
}

impl SshSettings {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_strict_host_key_checking(mut self, value: impl Into<String>) -> Self {
        self.strict_host_key_checking = value.into();
        self
    }

    /// Options common to every ssh invocation for this target
    ///
    /// Without a password, prompts are disabled so a missing key fails
    /// fast instead of hanging on the terminal.
    pub fn client_args(&self, descriptor: &DeploymentDescriptor, has_password: bool) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)),
            "-o".to_string(),
            format!("StrictHostKeyChecking={}", self.strict_host_key_checking),
            "-o".to_string(),
            "ServerAliveInterval=15".to_string(),
        ];
        if let Some(key) = &descriptor.server.key_path {
            args.push("-i".to_string());
            args.push(key.display().to_string());
        }
        if has_password {
            args.push("-o".to_string());
            args.push("NumberOfPasswordPrompts=1".to_string());
        } else {
            args.push("-o".to_string());
            args.push("BatchMode=yes".to_string());
        }
        args
    }
}
