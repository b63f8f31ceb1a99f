//! SSH Connector
//!
//! Establishes a multiplexed OpenSSH master connection. Later commands,
//! rsync and scp all ride on its control socket, so authentication happens
//! once per run.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::process::{Command, Stdio};

use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::domain::entities::DeploymentDescriptor;
use crate::domain::ports::{Connector, RemoteSession};
use crate::domain::services::ansi::sanitize;
use crate::domain::value_objects::Secret;
use crate::error::{RolloutError, RolloutResult};
use crate::infrastructure::process::SystemCommandRunner;

use super::options::SshSettings;
use super::session::SshSession;

/// Credential helper that feeds the password from `SSHPASS`
pub const CREDENTIAL_HELPER: &str = "sshpass";

/// Connector backed by the system `ssh` client
#[derive(Debug, Clone, Default)]
pub struct SshConnector {
    settings: SshSettings,
}

impl SshConnector {
    pub fn new(settings: SshSettings) -> Self {
        Self { settings }
    }

    /// Build the master command; wraps it in the credential helper when a
    /// password is set and the helper exists
    fn master_command(
        &self,
        descriptor: &DeploymentDescriptor,
        password: &Secret,
        control_path: &std::path::Path,
        client_args: &[String],
    ) -> Command {
        let use_helper =
            !password.is_empty() && SystemCommandRunner::check_available(CREDENTIAL_HELPER);
        if !password.is_empty() && !use_helper {
            warn!("sshpass not found; ssh will prompt for the password");
        }

        let mut cmd = if use_helper {
            let mut cmd = Command::new(CREDENTIAL_HELPER);
            cmd.arg("-e").arg("ssh").env("SSHPASS", password.expose());
            cmd
        } else {
            Command::new("ssh")
        };

        cmd.arg("-M")
            .arg("-S")
            .arg(control_path)
            .arg("-o")
            .arg("ControlPersist=yes")
            .arg("-p")
            .arg(descriptor.server.port.to_string())
            .args(client_args)
            .arg("-N")
            .arg("-f")
            .arg(descriptor.server.destination());
        cmd
    }
}

impl Connector for SshConnector {
    fn connect(
        &self,
        descriptor: &DeploymentDescriptor,
        password: &Secret,
    ) -> RolloutResult<Box<dyn RemoteSession>> {
        let destination = descriptor.server.destination();
        let connection_error = |message: String| RolloutError::Connection {
            destination: destination.clone(),
            message,
        };

        let control_dir = tempfile::Builder::new()
            .prefix("rollout-ssh-")
            .tempdir()?;
        let control_path = control_dir.path().join("ctl");
        let client_args = self
            .settings
            .client_args(descriptor, !password.is_empty());

        // The backgrounded master keeps inherited pipes open, so errors go
        // to a file that can be read without waiting for EOF.
        let mut errors = tempfile::tempfile()?;
        let mut cmd = self.master_command(descriptor, password, &control_path, &client_args);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .stderr(Stdio::from(errors.try_clone()?));

        debug!(%destination, port = descriptor.server.port, "opening ssh master");
        let mut child = cmd
            .spawn()
            .map_err(|e| connection_error(format!("could not start ssh: {}", e)))?;

        match child.wait_timeout(self.settings.connect_timeout)? {
            Some(status) if status.success() => {
                debug!(%destination, "ssh master established");
                Ok(Box::new(SshSession::new(
                    destination.clone(),
                    descriptor.server.port,
                    control_dir,
                    control_path,
                    client_args,
                    password.clone(),
                )))
            }
            Some(status) => {
                let detail = read_errors(&mut errors);
                Err(connection_error(if detail.is_empty() {
                    format!("ssh exited with status {}", status.code().unwrap_or(-1))
                } else {
                    detail
                }))
            }
            None => {
                let _ = child.kill();
                let _ = child.wait();
                Err(connection_error(format!(
                    "timed out after {} seconds",
                    self.settings.connect_timeout.as_secs()
                )))
            }
        }
    }
}

/// Last non-empty stderr line of the master process
fn read_errors(file: &mut File) -> String {
    let mut raw = String::new();
    if file.seek(SeekFrom::Start(0)).is_err() || file.read_to_string(&mut raw).is_err() {
        return String::new();
    }
    raw.lines()
        .map(sanitize)
        .filter(|l| !l.trim().is_empty())
        .last()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ServerTarget;
    use std::io::Write;
    use std::path::Path;

    #[test]
    fn read_errors_returns_last_meaningful_line() {
        let mut file = tempfile::tempfile().unwrap();
        writeln!(file, "Warning: Permanently added 'h' to known hosts.").unwrap();
        writeln!(file, "deploy@h: Permission denied (publickey).").unwrap();
        writeln!(file).unwrap();
        assert_eq!(
            read_errors(&mut file),
            "deploy@h: Permission denied (publickey)."
        );
    }

    #[test]
    fn master_command_without_password_uses_plain_ssh() {
        let descriptor = DeploymentDescriptor::new(ServerTarget::new("h", "u"), "/srv", "app");
        let connector = SshConnector::default();
        let cmd = connector.master_command(&descriptor, &Secret::empty(), Path::new("/tmp/c"), &[]);
        assert_eq!(cmd.get_program(), "ssh");
        let args: Vec<_> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args.first().map(String::as_str), Some("-M"));
        assert_eq!(args.last().map(String::as_str), Some("u@h"));
        assert!(args.contains(&"ControlPersist=yes".to_string()));
    }
}
