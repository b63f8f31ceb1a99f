//! POSIX shell quoting for remote command lines

/// Quote a single argument with single quotes
///
/// Embedded single quotes become `'\''`.
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Quote a remote path, keeping a leading `~` expandable
///
/// `~/apps/shop` renders as `"$HOME"/'apps/shop'` so the remote shell
/// still resolves the home directory.
pub fn quote_path(path: &str) -> String {
    if path == "~" {
        return "\"$HOME\"".to_string();
    }
    match path.strip_prefix("~/") {
        Some(rest) if rest.is_empty() => "\"$HOME\"/".to_string(),
        Some(rest) => format!("\"$HOME\"/{}", quote(rest)),
        None => quote(path),
    }
}

/// Join a remote directory and an entry name
pub fn join_remote(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// Wrap a user-supplied command in a brace group
///
/// The group exits with the status of its last command, so `||`, `;` or a
/// trailing `#` comment inside `command` cannot regroup the surrounding
/// `&&` chain. The newline closes any comment before the `}`.
pub fn group(command: &str) -> String {
    format!("{{ {}\n}}", command.trim_end())
}

/// Whether `name` can be exported as a shell variable
pub fn is_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
