//! Remote Command Composer
//!
//! Builds the remote pipeline for one deployment:
//!
//! 1. shell preamble (never fails)
//! 2. `cd` into the deployment directory
//! 3. user pre-commands, in order, each in its own brace group
//! 4. dependency install and native rebuild, when required
//! 5. export the runtime env file
//! 6. idempotent service action
//!
//! Composition is a pure function of the descriptor and the install
//! decision, so the same inputs always render the same text.

use crate::domain::entities::{CommandPipeline, DeploymentDescriptor, StepKind};
use crate::domain::services::dependency_diff::ENV_FILE;
use crate::domain::services::shell::{group, quote, quote_path};

/// Non-failing shell setup so version-managed tools resolve
pub const SHELL_PREAMBLE: &str = "{ export PATH=\"$PATH:/usr/local/bin:/usr/bin:/bin\"; \
[ -f ~/.profile ] && . ~/.profile >/dev/null 2>&1; \
[ -f ~/.bashrc ] && . ~/.bashrc >/dev/null 2>&1; \
[ -f ~/.zshrc ] && . ~/.zshrc >/dev/null 2>&1; \
[ -s \"$HOME/.nvm/nvm.sh\" ] && . \"$HOME/.nvm/nvm.sh\" >/dev/null 2>&1; \
true; }";

/// npm settings that tolerate engine and peer mismatches on the server
const NPM_ENV: &str = "NPM_CONFIG_ENGINE_STRICT=false NPM_CONFIG_LEGACY_PEER_DEPS=true";

/// Printed when every rebuild attempt failed
pub const REBUILD_WARNING: &str = "rollout: native module rebuild failed, continuing";

/// Supervisor verb chosen by the check-then-act protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    /// Process already registered: zero-downtime reload with fresh env
    Reload,
    /// Not registered yet: start it
    Start,
}

/// Exactly one action for a given registration state
pub fn service_action(registered: bool) -> ServiceAction {
    if registered {
        ServiceAction::Reload
    } else {
        ServiceAction::Start
    }
}

/// Shell command for a single supervisor action
pub fn service_command(descriptor: &DeploymentDescriptor, action: ServiceAction) -> String {
    let app = quote(&descriptor.app_name);
    match action {
        ServiceAction::Reload => format!("pm2 reload {} --update-env", app),
        ServiceAction::Start => match &descriptor.start_command {
            Some(command) => group(command),
            None => format!(
                "pm2 start {} --name {} --env {}",
                quote(&descriptor.entry_point),
                app,
                quote(&descriptor.build_profile)
            ),
        },
    }
}

/// Registration probe used by the check step
pub fn registration_probe(descriptor: &DeploymentDescriptor) -> String {
    format!(
        "pm2 describe {} >/dev/null 2>&1",
        quote(&descriptor.app_name)
    )
}

fn install_command(optimize: bool) -> String {
    if optimize {
        format!(
            "{} npm install --omit=dev --prefer-offline --no-audit --no-progress",
            NPM_ENV
        )
    } else {
        format!("{} npm ci --omit=dev --no-audit --no-progress", NPM_ENV)
    }
}

/// Ordered rebuild attempts, first success wins
pub fn rebuild_chain() -> [String; 3] {
    [
        format!("{} npm rebuild --update-binary", NPM_ENV),
        format!("{} npm rebuild --build-from-source", NPM_ENV),
        format!("echo {} >&2", quote(REBUILD_WARNING)),
    ]
}

fn rebuild_command() -> String {
    fallback_group(&rebuild_chain())
}

/// `{ a || b || c; }`: later attempts run only when earlier ones fail
fn fallback_group(attempts: &[String]) -> String {
    format!("{{ {}; }}", attempts.join(" || "))
}

fn service_step(descriptor: &DeploymentDescriptor) -> String {
    if !descriptor.use_supervisor {
        return format!("exec node {}", quote(&descriptor.entry_point));
    }
    format!(
        "if {}; then {}; else {}; fi",
        registration_probe(descriptor),
        service_command(descriptor, ServiceAction::Reload),
        service_command(descriptor, ServiceAction::Start)
    )
}

/// Compose the deployment pipeline
pub fn compose(descriptor: &DeploymentDescriptor, should_install: bool) -> CommandPipeline {
    let mut pipeline = CommandPipeline::new();
    pipeline.push(StepKind::Preamble, SHELL_PREAMBLE);
    pipeline.push(
        StepKind::ChangeDirectory,
        format!("cd {}", quote_path(&descriptor.remote_path)),
    );

    for command in descriptor.pre_commands.iter().filter(|c| !c.trim().is_empty()) {
        pipeline.push(StepKind::PreCommand, group(command));
    }

    if should_install {
        pipeline.push(
            StepKind::Install,
            install_command(descriptor.optimize_install),
        );
        pipeline.push(StepKind::Rebuild, rebuild_command());
    }

    pipeline.push(
        StepKind::LoadEnv,
        format!("set -a && . ./{} && set +a", ENV_FILE),
    );
    pipeline.push(StepKind::ServiceAction, service_step(descriptor));
    pipeline
}

/// Pipeline for a single post-deploy command
pub fn compose_post_command(descriptor: &DeploymentDescriptor, command: &str) -> CommandPipeline {
    let mut pipeline = CommandPipeline::new();
    pipeline.push(StepKind::Preamble, SHELL_PREAMBLE);
    pipeline.push(
        StepKind::ChangeDirectory,
        format!("cd {}", quote_path(&descriptor.remote_path)),
    );
    pipeline.push(StepKind::PreCommand, group(command));
    pipeline
}

/// Supervisor process list as JSON
pub fn process_list_command() -> String {
    format!("{} && pm2 jlist", SHELL_PREAMBLE)
}

/// How much supervisor log output to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogWindow {
    /// The last `n` lines, then exit
    Tail(usize),
    /// New lines only, until the connection closes
    Follow,
}

/// Supervisor log command for `process`
pub fn logs_command(process: &str, window: LogWindow) -> String {
    let range = match window {
        LogWindow::Tail(lines) => format!("--lines {} --nostream", lines),
        LogWindow::Follow => "--lines 0 --raw".to_string(),
    };
    format!("{} && pm2 logs {} {}", SHELL_PREAMBLE, quote(process), range)
}
