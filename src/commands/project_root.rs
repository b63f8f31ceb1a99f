use std::fs;
use std::path::{Path, PathBuf};

/// Discover the project root directory from an invocation directory.
///
/// Heuristics (first match wins, walking upward from `start`):
/// - a `.rollout.<env>.json` descriptor
/// - `package.json` (the app being deployed)
/// - `.git/` or `.git` file (git repo root / worktree)
///
/// Falls back to `start` when no markers are found.
pub(crate) fn discover_project_root(start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if has_descriptor(dir) || dir.join("package.json").is_file() || dir.join(".git").exists()
        {
            return dir.to_path_buf();
        }
    }
    start.to_path_buf()
}

fn has_descriptor(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries.flatten().any(|entry| {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        name.starts_with(".rollout.") && name.ends_with(".json")
    })
}
