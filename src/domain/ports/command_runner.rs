//! Local Command Runner Port
//!
//! Spawns local subprocesses (build tool, transfer tools) and streams their
//! output line by line to an observer.

use std::path::PathBuf;

use crate::domain::value_objects::{LogEvent, Secret};
use crate::error::RolloutResult;

/// Receives output lines as they arrive
pub trait LogObserver: Send + Sync {
    fn on_line(&self, event: LogEvent);
}

/// Observer that drops every line
pub struct DiscardObserver;

impl LogObserver for DiscardObserver {
    fn on_line(&self, _event: LogEvent) {}
}

impl<F> LogObserver for F
where
    F: Fn(LogEvent) + Send + Sync,
{
    fn on_line(&self, event: LogEvent) {
        self(event)
    }
}

/// A local command to spawn
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Environment overlay on top of the inherited environment
    pub env: Vec<(String, String)>,
    /// Secret variables, kept out of Debug output and logs
    pub secret_env: Vec<(String, Secret)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn envs(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(vars);
        self
    }

    pub fn secret_env(mut self, key: impl Into<String>, value: Secret) -> Self {
        self.secret_env.push((key.into(), value));
        self
    }

    /// `program arg1 arg2`, for logs
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs local subprocesses
pub trait CommandRunner: Send + Sync {
    /// Run to completion, streaming lines; returns the exit code
    ///
    /// A signal-terminated process reports `-1`.
    fn run(&self, spec: &CommandSpec, observer: &dyn LogObserver) -> RolloutResult<i32>;

    /// Whether `program` can be spawned
    fn is_available(&self, program: &str) -> bool;
}
