//! Rollout CLI - build, ship and restart web applications over SSH
//!
//! Usage: rollout <COMMAND>
//!
//! Commands:
//!   deploy   Build locally, transfer, install and (re)start the app
//!   init     Create a starter deployment descriptor
//!   encrypt  Encrypt a password for server.password
//!   ps       List supervisor processes on the host
//!   logs     Show recent supervisor log lines, or follow them

mod commands;
mod ui;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use rollout::application::RemoteLogsQuery;
use rollout::presentation::{Cli, Commands};
use tracing_subscriber::EnvFilter;

use commands::init::InitArgs;
use commands::GlobalFlags;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let flags = GlobalFlags {
        json: cli.json,
        color: cli.color,
    };

    match run(flags, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.downcast_ref::<commands::Reported>().is_none() {
                ui::error::print_error(&err, flags.json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(flags: GlobalFlags, command: Commands) -> Result<()> {
    match command {
        Commands::Deploy { target, skip_post } => {
            commands::deploy::cmd_deploy(flags, &target, skip_post)
        }
        Commands::Init {
            env,
            host,
            user,
            path,
            app,
            password_stdin,
            force,
        } => commands::init::cmd_init(
            flags,
            InitArgs {
                env,
                host,
                user,
                path,
                app,
                password_stdin,
                force,
            },
        ),
        Commands::Encrypt => commands::encrypt::cmd_encrypt(flags),
        Commands::Ps { target } => commands::ps::cmd_ps(flags, &target),
        Commands::Logs {
            target,
            lines,
            follow,
            process,
        } => {
            let query = RemoteLogsQuery::new(lines)
                .with_follow(follow)
                .with_process(process);
            commands::logs::cmd_logs(flags, &target, &query)
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` enables debug and `-vv` trace
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "rollout=debug,warn",
            _ => "rollout=trace,debug",
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .try_init();
}
