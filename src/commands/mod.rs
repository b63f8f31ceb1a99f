//! Command handlers
//!
//! Each handler loads what it needs, calls into the library and renders
//! the outcome. Errors bubble up as `anyhow::Error` and are rendered once
//! by `main`.

pub mod deploy;
pub mod encrypt;
pub mod init;
pub mod logs;
pub mod project_root;
pub mod ps;

use std::path::PathBuf;

use anyhow::{Context, Result};
use rollout::infrastructure::{DescriptorOverrides, JsonDescriptorRepository};
use rollout::presentation::{ColorWhen, TargetArgs};
use rollout::{Config, DeploymentDescriptor, RolloutError};

use crate::ui::context::UiContext;
use crate::ui::output::print_config_warnings;
use project_root::discover_project_root;

/// Failure already rendered by the deploy event sink
///
/// `main` only turns it into the exit status.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Reported(#[from] pub RolloutError);

/// Global flags shared by every command
#[derive(Debug, Clone, Copy)]
pub struct GlobalFlags {
    pub json: bool,
    pub color: Option<ColorWhen>,
}

/// Project root, layered config and UI settings for one invocation
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub ui: UiContext,
}

impl CommandContext {
    pub fn load(flags: GlobalFlags) -> Result<Self> {
        let cwd = std::env::current_dir().context("could not read the current directory")?;
        let project_root = discover_project_root(&cwd);
        let (config, warnings) = Config::load_layered(&project_root)?;
        let ui = UiContext::new(flags.json, flags.color, &config);
        print_config_warnings(&ui, &warnings);
        Ok(Self {
            project_root,
            config,
            ui,
        })
    }

    pub fn repository(&self) -> JsonDescriptorRepository {
        JsonDescriptorRepository::new(&self.project_root)
    }

    /// Load the descriptor selected by `--env` with CLI overrides applied
    pub fn descriptor(&self, target: &TargetArgs) -> Result<DeploymentDescriptor> {
        let overrides = DescriptorOverrides {
            host: target.host.clone(),
            user: target.user.clone(),
            path: target.path.clone(),
        };
        Ok(self.repository().load(target.env.as_deref(), &overrides)?)
    }
}
