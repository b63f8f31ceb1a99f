//! System Command Runner
//!
//! Spawns local subprocesses with piped output and streams it through
//! `SessionLogStream`.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::ports::{CommandRunner, CommandSpec, LogObserver};
use crate::error::RolloutResult;

use super::stream::SessionLogStream;

/// Command runner backed by `std::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// Check whether a program can be spawned at all
    ///
    /// Only a failed spawn counts as missing; tools disagree on which
    /// version flag exits zero.
    pub fn check_available(program: &str) -> bool {
        Command::new(program)
            .arg("-V")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        for (key, secret) in &spec.secret_env {
            cmd.env(key, secret.expose());
        }
        cmd
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec, observer: &dyn LogObserver) -> RolloutResult<i32> {
        debug!(command = %spec.display(), cwd = ?spec.cwd, "spawning");
        let mut child = Self::command(spec).spawn()?;
        let code = SessionLogStream::new(observer).run(&mut child)?;
        debug!(command = %spec.program, code, "exited");
        Ok(code)
    }

    fn is_available(&self, program: &str) -> bool {
        Self::check_available(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{LogEvent, Secret};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<String>>);

    impl LogObserver for Collect {
        fn on_line(&self, event: LogEvent) {
            self.0.lock().unwrap().push(event.sanitized);
        }
    }

    #[test]
    fn missing_program_is_unavailable() {
        assert!(!SystemCommandRunner::check_available(
            "rollout-definitely-not-a-real-binary"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn run_passes_env_and_secret_env() {
        let collect = Collect::default();
        let spec = CommandSpec::new("sh")
            .args(["-c", "echo \"$GREETING $TOKEN\""])
            .env("GREETING", "hello")
            .secret_env("TOKEN", Secret::new("t0k"));

        let code = SystemCommandRunner.run(&spec, &collect).unwrap();
        assert_eq!(code, 0);
        assert_eq!(collect.0.lock().unwrap().as_slice(), ["hello t0k".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn run_honours_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();
        let collect = Collect::default();
        let spec = CommandSpec::new("ls").current_dir(dir.path());
        SystemCommandRunner.run(&spec, &collect).unwrap();
        assert!(collect.0.lock().unwrap().contains(&"marker.txt".to_string()));
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let spec = CommandSpec::new("rollout-definitely-not-a-real-binary");
        assert!(SystemCommandRunner
            .run(&spec, &crate::domain::ports::DiscardObserver)
            .is_err());
    }
}
