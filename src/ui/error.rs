use rollout::RolloutError;

use crate::ui::blocks::error::ErrorBlock;
use crate::ui::json;

pub fn format_rollout_error(err: &RolloutError) -> String {
    let caps = crate::ui::terminal::detect_capabilities();
    format_rollout_error_with(err, caps.supports_color, caps.supports_unicode)
}

fn format_rollout_error_with(
    err: &RolloutError,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let block = match err {
        RolloutError::DescriptorNotFound { dir } => ErrorBlock::new("no descriptor", err.to_string())
            .with_file(dir)
            .with_fix("Create one with: rollout init --env production --host <host> --user <user>"),
        RolloutError::AmbiguousDescriptor { .. } => ErrorBlock::new("ambiguous descriptor", err.to_string())
            .with_fix("Pass --env <name> to pick one"),
        RolloutError::InvalidDescriptor { file, message } => {
            ErrorBlock::new("invalid descriptor", message.as_str()).with_file(file)
        }
        RolloutError::Config { file, message } => {
            ErrorBlock::new("invalid configuration", message.as_str()).with_file(file)
        }
        RolloutError::Connection { .. } => ErrorBlock::new("connection", err.to_string()).with_fix(
            "Check server.host, server.user and the key or password; rerun with -v for ssh details",
        ),
        RolloutError::Credential => ErrorBlock::new("credential", err.to_string())
            .with_fix("Re-encrypt the password on this machine with: rollout encrypt"),
        RolloutError::ArtifactNotFound { .. } => ErrorBlock::new("build", err.to_string())
            .with_fix("Make sure the build script writes its output to one of these directories"),
        RolloutError::RunInProgress => ErrorBlock::new("busy", err.to_string())
            .with_fix("Wait for the other deployment in this project to finish"),
        other => ErrorBlock::new(other.kind().replace('_', " "), other.to_string()),
    };
    block.render(supports_color, supports_unicode)
}

pub fn format_error(err: &anyhow::Error) -> String {
    if let Some(rollout) = err.downcast_ref::<RolloutError>() {
        return format_rollout_error(rollout);
    }

    format!("[ERROR] {:#}\n", err)
}

/// Machine-readable kind of an error, `"internal"` for non-library errors
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<RolloutError>()
        .map(RolloutError::kind)
        .unwrap_or("internal")
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        json::emit(serde_json::json!({
            "event": "error",
            "kind": error_kind(err),
            "message": format!("{:#}", err),
        }));
        return;
    }

    eprint!("{}", format_error(err));
}
