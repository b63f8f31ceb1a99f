//! Test environment for isolated Rollout runs.
//!
//! Provides `TestEnv` - a temp project directory and a temp home, plus
//! helpers to run the `rollout` binary inside them.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Result of running a Rollout CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    #[allow(dead_code)]
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON records
    #[allow(dead_code)]
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad json {l:?}: {e}")))
            .collect()
    }
}

/// Isolated project and home directories
pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
    bin: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let project_root = tempfile::Builder::new()
            .prefix("shop-")
            .tempdir()
            .expect("create project dir");
        std::fs::write(project_root.path().join("package.json"), "{}\n")
            .expect("write package.json");
        Self {
            project_root,
            home_dir: tempfile::tempdir().expect("create home dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_rollout")),
        }
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write_project_file(&self, relative: &str, content: &str) {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create directories");
        }
        std::fs::write(&path, content).expect("write file");
    }

    pub fn read_project_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.project_path(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }

    /// Run from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_stdin(args, None)
    }

    /// Run from the project root, feeding `stdin` when given
    pub fn run_with_stdin(&self, args: &[&str], stdin: Option<&str>) -> TestResult {
        let mut cmd = self.command(self.project_root.path(), args);
        cmd.stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = cmd.spawn().expect("spawn rollout");
        if let Some(input) = stdin {
            let mut pipe = child.stdin.take().expect("stdin pipe");
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
        to_result(child.wait_with_output().expect("wait for rollout"))
    }

    fn command(&self, cwd: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(cwd)
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("ROLLOUT_NO_COLOR", "1")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("ROLLOUT_CONNECT_TIMEOUT")
            .env_remove("ROLLOUT_PACKAGE_MANAGER")
            .env_remove("ROLLOUT_TRANSFER");
        cmd
    }
}

fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
