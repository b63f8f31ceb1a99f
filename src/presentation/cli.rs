//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--json, --color, --verbose) are inherited by all subcommands
//! - Descriptor selection (`--env`) and target overrides are shared by the
//!   commands that talk to a host

use clap::{Args, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Rollout - build, ship and restart web applications over SSH
#[derive(Parser, Debug)]
#[command(name = "rollout")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'rollout init' in a project to create a deployment descriptor.")]
pub struct Cli {
    /// Output NDJSON events for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which descriptor to load and what to override in it
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    /// Environment name (selects .rollout.<env>.json)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Override server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Override server.user
    #[arg(long)]
    pub user: Option<String>,

    /// Override deploy.path
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build locally, transfer, install and (re)start the app
    Deploy {
        #[command(flatten)]
        target: TargetArgs,

        /// Skip deploy.postDeploy commands
        #[arg(long)]
        skip_post: bool,
    },

    /// Create a starter deployment descriptor
    Init {
        /// Environment name
        #[arg(short, long, default_value = "production")]
        env: String,

        /// Server host
        #[arg(long, default_value = "")]
        host: String,

        /// Login user
        #[arg(long, default_value = "")]
        user: String,

        /// Remote deployment directory (default: /var/www/<app>)
        #[arg(long)]
        path: Option<String>,

        /// Application name (default: project directory name)
        #[arg(long)]
        app: Option<String>,

        /// Read a password from stdin and store it encrypted
        #[arg(long)]
        password_stdin: bool,

        /// Overwrite an existing descriptor
        #[arg(short, long)]
        force: bool,
    },

    /// Encrypt a password from stdin for server.password
    Encrypt,

    /// List supervisor processes on the host
    Ps {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show recent supervisor log lines, or follow them live
    Logs {
        #[command(flatten)]
        target: TargetArgs,

        /// Number of lines
        #[arg(short = 'n', long, default_value_t = 100, conflicts_with = "follow")]
        lines: usize,

        /// Stream new lines until interrupted
        #[arg(short, long)]
        follow: bool,

        /// Supervisor process to read (default: the app name)
        #[arg(short, long)]
        process: Option<String>,
    },
}
