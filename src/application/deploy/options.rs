//! Deploy Options

use std::path::PathBuf;

/// Options for one deployment run
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Local project root (where the build runs)
    pub project_root: PathBuf,
    /// Run the descriptor's post-deploy commands after success
    pub run_post_commands: bool,
}

impl DeployOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            run_post_commands: true,
        }
    }

    pub fn with_post_commands(mut self, enabled: bool) -> Self {
        self.run_post_commands = enabled;
        self
    }
}
