//! Supervisor status and log queries
//!
//! Read-only remote operations used by `rollout ps` and `rollout logs`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::DeploymentDescriptor;
use crate::domain::ports::{LogObserver, RemoteSession};
use crate::domain::services::composer::{logs_command, process_list_command, LogWindow};
use crate::error::{RolloutError, RolloutResult};

/// One supervisor-managed process
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessInfo {
    pub name: String,
    pub id: u64,
    pub status: String,
    /// CPU usage in percent
    pub cpu: f64,
    /// Resident memory in bytes
    pub memory: u64,
}

#[derive(Debug, Deserialize)]
struct JlistEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    pm_id: u64,
    #[serde(default)]
    monit: JlistMonit,
    #[serde(default)]
    pm2_env: JlistEnv,
}

#[derive(Debug, Default, Deserialize)]
struct JlistMonit {
    #[serde(default)]
    cpu: f64,
    #[serde(default)]
    memory: u64,
}

#[derive(Debug, Default, Deserialize)]
struct JlistEnv {
    #[serde(default)]
    status: String,
}

/// Parse `pm2 jlist` output
///
/// Profile scripts may print before the JSON array, so parsing starts at
/// the first line that opens one.
pub fn parse_process_list(output: &str) -> RolloutResult<Vec<ProcessInfo>> {
    let start = output
        .lines()
        .scan(0usize, |offset, line| {
            let at = *offset;
            *offset += line.len() + 1;
            Some((at, line))
        })
        .find(|(_, line)| line.trim_start().starts_with('['))
        .map(|(at, _)| at);

    let Some(start) = start else {
        return Ok(Vec::new());
    };

    let entries: Vec<JlistEntry> = serde_json::from_str(output[start..].trim())?;
    Ok(entries
        .into_iter()
        .map(|e| ProcessInfo {
            name: e.name,
            id: e.pm_id,
            status: e.pm2_env.status,
            cpu: e.monit.cpu,
            memory: e.monit.memory,
        })
        .collect())
}

/// Lists supervisor processes on the host
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessStatusQuery;

impl ProcessStatusQuery {
    pub fn execute(&self, session: &mut dyn RemoteSession) -> RolloutResult<Vec<ProcessInfo>> {
        let output = session.capture(&process_list_command())?;
        if !output.success() {
            return Err(RolloutError::RemoteCommand { code: output.code });
        }
        let processes = parse_process_list(&output.stdout)?;
        debug!(count = processes.len(), "supervisor processes");
        Ok(processes)
    }
}

/// Streams supervisor log lines for one process
///
/// Reads the app's own process unless another is named. In follow mode the
/// command runs until the connection closes or the user interrupts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLogsQuery {
    lines: usize,
    follow: bool,
    process: Option<String>,
}

impl RemoteLogsQuery {
    pub fn new(lines: usize) -> Self {
        Self {
            lines,
            follow: false,
            process: None,
        }
    }

    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    pub fn with_process(mut self, process: Option<String>) -> Self {
        self.process = process.filter(|p| !p.trim().is_empty());
        self
    }

    /// Process whose logs are read
    pub fn process_name<'a>(&'a self, descriptor: &'a DeploymentDescriptor) -> &'a str {
        self.process.as_deref().unwrap_or(&descriptor.app_name)
    }

    fn window(&self) -> LogWindow {
        if self.follow {
            LogWindow::Follow
        } else {
            LogWindow::Tail(self.lines)
        }
    }

    pub fn execute(
        &self,
        descriptor: &DeploymentDescriptor,
        session: &mut dyn RemoteSession,
        observer: &dyn LogObserver,
    ) -> RolloutResult<()> {
        let process = self.process_name(descriptor);
        debug!(process, follow = self.follow, "reading supervisor logs");
        let code = session.exec(&logs_command(process, self.window()), observer)?;
        if code != 0 {
            return Err(RolloutError::RemoteCommand { code });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ServerTarget;
    use crate::domain::ports::{CommandOutput, DiscardObserver, TransportSpec};

    const JLIST: &str = r#"[{"name":"shop","pm_id":0,"monit":{"memory":52428800,"cpu":1.5},"pm2_env":{"status":"online"}},{"name":"worker","pm_id":1,"monit":{"memory":0,"cpu":0},"pm2_env":{"status":"stopped"}}]"#;

    struct ScriptedSession {
        stdout: String,
        code: i32,
        last: Option<String>,
    }

    impl RemoteSession for ScriptedSession {
        fn exec(&mut self, command: &str, _observer: &dyn LogObserver) -> RolloutResult<i32> {
            self.last = Some(command.to_string());
            Ok(self.code)
        }

        fn capture(&mut self, command: &str) -> RolloutResult<CommandOutput> {
            self.last = Some(command.to_string());
            Ok(CommandOutput {
                code: self.code,
                stdout: self.stdout.clone(),
                stderr: String::new(),
            })
        }

        fn transport(&self) -> TransportSpec {
            TransportSpec::default()
        }

        fn close(&mut self) -> RolloutResult<()> {
            Ok(())
        }
    }

    #[test]
    fn parses_jlist_entries() {
        let processes = parse_process_list(JLIST).unwrap();
        assert_eq!(processes.len(), 2);
        assert_eq!(processes[0].name, "shop");
        assert_eq!(processes[0].status, "online");
        assert_eq!(processes[0].memory, 52_428_800);
        assert_eq!(processes[1].id, 1);
    }

    #[test]
    fn skips_profile_noise_before_json() {
        let noisy = format!("Welcome to the server\nnvm: using node v20\n{}\n", JLIST);
        assert_eq!(parse_process_list(&noisy).unwrap().len(), 2);
    }

    #[test]
    fn no_json_means_no_processes() {
        assert!(parse_process_list("").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_process_list("[{\"name\":").is_err());
    }

    #[test]
    fn status_query_fails_on_non_zero_exit() {
        let mut session = ScriptedSession {
            stdout: String::new(),
            code: 127,
            last: None,
        };
        let err = ProcessStatusQuery.execute(&mut session).unwrap_err();
        assert!(matches!(err, RolloutError::RemoteCommand { code: 127 }));
    }

    fn quiet_session() -> ScriptedSession {
        ScriptedSession {
            stdout: String::new(),
            code: 0,
            last: None,
        }
    }

    fn descriptor() -> DeploymentDescriptor {
        DeploymentDescriptor::new(ServerTarget::new("h", "u"), "/srv/app", "shop")
    }

    #[test]
    fn logs_query_requests_fixed_line_count() {
        let mut session = quiet_session();
        RemoteLogsQuery::new(100)
            .execute(&descriptor(), &mut session, &DiscardObserver)
            .unwrap();
        assert!(session
            .last
            .unwrap()
            .ends_with("pm2 logs 'shop' --lines 100 --nostream"));
    }

    #[test]
    fn follow_query_streams_named_process() {
        let mut session = quiet_session();
        RemoteLogsQuery::new(100)
            .with_follow(true)
            .with_process(Some("worker".into()))
            .execute(&descriptor(), &mut session, &DiscardObserver)
            .unwrap();
        assert!(session
            .last
            .unwrap()
            .ends_with("pm2 logs 'worker' --lines 0 --raw"));
    }

    #[test]
    fn blank_process_falls_back_to_app_name() {
        let query = RemoteLogsQuery::new(10).with_process(Some("  ".into()));
        assert_eq!(query.process_name(&descriptor()), "shop");
    }

    #[test]
    fn logs_query_fails_on_non_zero_exit() {
        let mut session = ScriptedSession {
            code: 1,
            ..quiet_session()
        };
        let err = RemoteLogsQuery::new(5)
            .execute(&descriptor(), &mut session, &DiscardObserver)
            .unwrap_err();
        assert!(matches!(err, RolloutError::RemoteCommand { code: 1 }));
    }
}
