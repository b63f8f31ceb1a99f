//! SSH Session
//!
//! Commands run as multiplexed clients of the master connection. `exec`
//! forces a pseudo-terminal (`-tt`) so remote tools emit their interactive
//! output, which `SessionLogStream` then sanitizes line by line.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::domain::ports::{CommandOutput, LogObserver, RemoteSession, TransportSpec};
use crate::domain::value_objects::Secret;
use crate::error::RolloutResult;
use crate::infrastructure::process::SessionLogStream;

/// Session over an OpenSSH control socket
pub struct SshSession {
    destination: String,
    port: u16,
    /// Owns the socket directory; removed on drop
    _control_dir: TempDir,
    control_path: PathBuf,
    client_args: Vec<String>,
    password: Secret,
    closed: bool,
}

impl SshSession {
    pub(super) fn new(
        destination: String,
        port: u16,
        control_dir: TempDir,
        control_path: PathBuf,
        client_args: Vec<String>,
        password: Secret,
    ) -> Self {
        Self {
            destination,
            port,
            _control_dir: control_dir,
            control_path,
            client_args,
            password,
            closed: false,
        }
    }

    /// `ssh -S <socket> [flags] <destination> <command>`
    fn client(&self, flags: &[&str], command: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg("-S")
            .arg(&self.control_path)
            .arg("-p")
            .arg(self.port.to_string())
            .args(flags)
            .arg(&self.destination)
            .arg(command);
        cmd
    }
}

impl RemoteSession for SshSession {
    fn exec(&mut self, command: &str, observer: &dyn LogObserver) -> RolloutResult<i32> {
        debug!(destination = %self.destination, "remote exec");
        let mut child = self
            .client(&["-tt", "-o", "LogLevel=QUIET"], command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let code = SessionLogStream::new(observer).run(&mut child)?;
        debug!(code, "remote exec finished");
        Ok(code)
    }

    fn capture(&mut self, command: &str) -> RolloutResult<CommandOutput> {
        let output = self
            .client(&["-T", "-o", "LogLevel=QUIET"], command)
            .stdin(Stdio::null())
            .output()?;
        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn transport(&self) -> TransportSpec {
        TransportSpec {
            destination: self.destination.clone(),
            port: self.port,
            control_path: Some(self.control_path.clone()),
            ssh_args: self.client_args.clone(),
            password: self.password.clone(),
        }
    }

    fn close(&mut self) -> RolloutResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let status = Command::new("ssh")
            .arg("-S")
            .arg(&self.control_path)
            .arg("-O")
            .arg("exit")
            .arg(&self.destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if !status.success() {
            warn!(destination = %self.destination, "ssh master did not acknowledge exit");
        }
        debug!(destination = %self.destination, "session closed");
        Ok(())
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "closing ssh session on drop failed");
        }
    }
}
