//! Remote Session Port
//!
//! An established remote shell: run commands with live output, capture
//! short outputs, and expose the transport so transfer tools can reuse the
//! same authenticated connection.

use std::path::PathBuf;

use crate::domain::entities::DeploymentDescriptor;
use crate::domain::ports::LogObserver;
use crate::domain::value_objects::Secret;
use crate::error::RolloutResult;

/// Captured result of a short remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// How to reach the host again from another tool (rsync, scp)
#[derive(Debug, Clone, Default)]
pub struct TransportSpec {
    /// `user@host`
    pub destination: String,
    pub port: u16,
    /// Multiplexing socket of the established session, if any
    pub control_path: Option<PathBuf>,
    /// Extra `-o` options and identity flags for the ssh client
    pub ssh_args: Vec<String>,
    /// Password for the credential helper; empty when unused
    pub password: Secret,
}

impl TransportSpec {
    /// Remote shell command line for `rsync -e`
    pub fn ssh_command(&self) -> String {
        let mut parts = vec!["ssh".to_string(), "-p".to_string(), self.port.to_string()];
        if let Some(path) = &self.control_path {
            parts.push("-o".to_string());
            parts.push(format!("ControlPath={}", path.display()));
        }
        parts.extend(self.ssh_args.iter().cloned());
        parts.join(" ")
    }

    /// Options for `scp` (which takes `-P` for the port)
    pub fn scp_args(&self) -> Vec<String> {
        let mut args = vec!["-P".to_string(), self.port.to_string()];
        if let Some(path) = &self.control_path {
            args.push("-o".to_string());
            args.push(format!("ControlPath={}", path.display()));
        }
        args.extend(self.ssh_args.iter().cloned());
        args
    }
}

/// An open remote shell session, exclusively owned by one run
pub trait RemoteSession: Send {
    /// Run a command under a pseudo-terminal, streaming sanitized lines
    /// until the remote output closes; returns the exit status
    fn exec(&mut self, command: &str, observer: &dyn LogObserver) -> RolloutResult<i32>;

    /// Run a short command and capture its output
    fn capture(&mut self, command: &str) -> RolloutResult<CommandOutput>;

    /// Transport details for tools that open their own channel
    fn transport(&self) -> TransportSpec;

    /// Close the session; idempotent
    fn close(&mut self) -> RolloutResult<()>;
}

/// Opens remote sessions
pub trait Connector: Send + Sync {
    /// Establish a session within the configured timeout
    fn connect(
        &self,
        descriptor: &DeploymentDescriptor,
        password: &Secret,
    ) -> RolloutResult<Box<dyn RemoteSession>>;
}
