//! Dependency Diff Rules
//!
//! Decides whether the remote install can be skipped, and renders the
//! commands that read and write the remote fingerprint marker together
//! with the runtime env file.

use crate::domain::entities::DeploymentDescriptor;
use crate::domain::services::shell::{join_remote, quote, quote_path};
use crate::domain::value_objects::Fingerprint;

/// Remote fingerprint marker file name
pub const MARKER_FILE: &str = ".lockhash";
/// Remote runtime env file name
pub const ENV_FILE: &str = ".env";

const TMP_SUFFIX: &str = ".rollout-tmp";

/// Whether the remote install must run
///
/// False only when both digests are known and equal.
pub fn should_install(local: Option<&Fingerprint>, remote: Option<&Fingerprint>) -> bool {
    match (local, remote) {
        (Some(local), Some(remote)) => local != remote,
        _ => true,
    }
}

/// Escape a value for a double-quoted `KEY="VALUE"` line
///
/// Line breaks stay literal: inside double quotes the shell keeps them, so
/// multi-line values survive `. ./.env` unchanged.
fn escape_env_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render the runtime env file: one `KEY="VALUE"` line per variable
pub fn render_env_file(vars: &[(String, String)]) -> String {
    vars.iter()
        .map(|(k, v)| format!("{}=\"{}\"\n", k, escape_env_value(v)))
        .collect()
}

/// Remote command printing the marker content, or nothing when absent
pub fn read_marker_command(descriptor: &DeploymentDescriptor) -> String {
    format!(
        "cat {} 2>/dev/null || true",
        quote_path(&join_remote(&descriptor.remote_path, MARKER_FILE))
    )
}

/// Remote command writing the runtime env file before the pipeline runs
///
/// The env file goes to a temporary first and is renamed into place. When
/// an install is about to run, the marker is dropped in the same command,
/// so an install that never completes leaves no digest behind.
pub fn runtime_files_command(descriptor: &DeploymentDescriptor, drop_marker: bool) -> String {
    let env_path = join_remote(&descriptor.remote_path, ENV_FILE);
    let env_tmp = quote_path(&format!("{}{}", env_path, TMP_SUFFIX));

    let env_content = render_env_file(&descriptor.runtime_env());
    let mut parts = vec![
        format!("mkdir -p {}", quote_path(&descriptor.remote_path)),
        format!("printf '%s' {} > {}", quote(&env_content), env_tmp),
        format!("mv -f {} {}", env_tmp, quote_path(&env_path)),
    ];
    if drop_marker {
        parts.push(format!(
            "rm -f {}",
            quote_path(&join_remote(&descriptor.remote_path, MARKER_FILE))
        ));
    }
    parts.join(" && ")
}

/// Pipeline fragment recording `digest` as the installed lock file
///
/// Runs inside the remote pipeline right after the install, so the marker
/// only lands once the install it describes has exited 0.
pub fn marker_write_command(descriptor: &DeploymentDescriptor, digest: &Fingerprint) -> String {
    let marker_path = join_remote(&descriptor.remote_path, MARKER_FILE);
    let marker_tmp = quote_path(&format!("{}{}", marker_path, TMP_SUFFIX));
    format!(
        "{{ printf '%s\\n' {} > {} && mv -f {} {}; }}",
        quote(digest.as_str()),
        marker_tmp,
        marker_tmp,
        quote_path(&marker_path)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ServerTarget;

    fn descriptor() -> DeploymentDescriptor {
        DeploymentDescriptor::new(ServerTarget::new("h", "u"), "/srv/app", "shop")
            .with_app_port(3001)
            .with_env("API", "https://x")
    }

    #[test]
    fn install_when_no_remote_marker() {
        let local = Fingerprint::of_bytes(b"lock");
        assert!(should_install(Some(&local), None));
    }

    #[test]
    fn skip_when_digests_match() {
        let local = Fingerprint::of_bytes(b"lock");
        let remote = Fingerprint::of_bytes(b"lock");
        assert!(!should_install(Some(&local), Some(&remote)));
    }

    #[test]
    fn install_when_digests_differ() {
        let local = Fingerprint::of_bytes(b"lock-a");
        let remote = Fingerprint::of_bytes(b"lock-b");
        assert!(should_install(Some(&local), Some(&remote)));
    }

    #[test]
    fn install_without_local_manifest() {
        let remote = Fingerprint::of_bytes(b"lock");
        assert!(should_install(None, Some(&remote)));
    }

    #[test]
    fn env_file_escapes_shell_specials() {
        let rendered = render_env_file(&[("A".into(), "say \"hi\" $HOME".into())]);
        assert_eq!(rendered, "A=\"say \\\"hi\\\" \\$HOME\"\n");
    }

    #[cfg(unix)]
    #[test]
    fn multi_line_values_survive_sourcing() {
        let dir = tempfile::tempdir().unwrap();
        let value = "line one\nline \"two\" $HOME\r\nend\\";
        std::fs::write(
            dir.path().join(ENV_FILE),
            render_env_file(&[("CERT".into(), value.into())]),
        )
        .unwrap();
        let output = std::process::Command::new("sh")
            .arg("-c")
            .arg("set -a && . ./.env && set +a && printf '%s' \"$CERT\"")
            .current_dir(dir.path())
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), value);
    }

    #[test]
    fn env_file_always_has_port() {
        let rendered = render_env_file(&descriptor().runtime_env());
        assert!(rendered.starts_with("PORT=\"3001\"\n"));
        assert!(rendered.contains("API=\"https://x\"\n"));
    }

    #[test]
    fn runtime_files_never_write_a_digest() {
        let cmd = runtime_files_command(&descriptor(), false);
        assert!(cmd.contains("mv -f '/srv/app/.env.rollout-tmp' '/srv/app/.env'"));
        assert!(!cmd.contains(MARKER_FILE));
    }

    #[test]
    fn runtime_files_drop_marker_before_install() {
        let cmd = runtime_files_command(&descriptor(), true);
        assert!(cmd.ends_with("rm -f '/srv/app/.lockhash'"));
    }

    #[test]
    fn marker_write_is_atomic_rename() {
        let digest = Fingerprint::of_bytes(b"lock");
        let cmd = marker_write_command(&descriptor(), &digest);
        assert!(cmd.starts_with("{ printf '%s\\n' "));
        assert!(cmd.contains(digest.as_str()));
        assert!(cmd.ends_with("mv -f '/srv/app/.lockhash.rollout-tmp' '/srv/app/.lockhash'; }"));
    }

    #[test]
    fn read_marker_never_fails() {
        assert_eq!(
            read_marker_command(&descriptor()),
            "cat '/srv/app/.lockhash' 2>/dev/null || true"
        );
    }
}
