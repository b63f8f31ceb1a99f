//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::value_objects::{PackageManager, TransferStrategyKind};
use crate::error::{RolloutError, RolloutResult};

use super::types::{ColorMode, Config};

/// Project config, relative to the project root
pub const PROJECT_CONFIG: &str = ".rollout/config.toml";

/// User config, relative to the config directory
pub const USER_CONFIG: &str = "rollout/config.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

fn config_error(path: &Path, message: impl Into<String>) -> RolloutError {
    RolloutError::Config {
        file: path.to_path_buf(),
        message: message.into(),
    }
}

/// Parse one file, returning its raw table and unknown-key warnings
fn read_layer(path: &Path) -> RolloutResult<(toml::Table, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);
    let _: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| config_error(path, e.to_string()))?;

    let table: toml::Table =
        toml::from_str(&content).map_err(|e| config_error(path, e.to_string()))?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((table, warnings))
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> RolloutResult<(Config, Vec<ConfigWarning>)> {
    let (table, warnings) = read_layer(path)?;
    let config = toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| config_error(path, e.to_string()))?;
    Ok((config, warnings))
}

/// Overlay `overlay` onto `base`; nested tables merge key by key
pub(super) fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Layer user config, project config, and environment overrides
pub fn load_layered(project_root: &Path) -> RolloutResult<(Config, Vec<ConfigWarning>)> {
    let mut layers = Vec::new();
    if let Some(dir) = dirs_config_dir() {
        layers.push(dir.join(USER_CONFIG));
    }
    layers.push(project_root.join(PROJECT_CONFIG));

    let mut merged = toml::Table::new();
    let mut warnings = Vec::new();
    let mut last = None;
    for path in layers.into_iter().filter(|p| p.is_file()) {
        debug!(file = %path.display(), "loading config layer");
        let (table, layer_warnings) = read_layer(&path)?;
        merge(&mut merged, table);
        warnings.extend(layer_warnings);
        last = Some(path);
    }

    let config: Config = toml::Value::Table(merged).try_into().map_err(|e: toml::de::Error| {
        config_error(
            last.as_deref().unwrap_or_else(|| Path::new(PROJECT_CONFIG)),
            e.to_string(),
        )
    })?;

    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (ROLLOUT_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Apply overrides from an arbitrary variable lookup
pub fn apply_env_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    // ROLLOUT_CONNECT_TIMEOUT
    if let Some(value) = lookup("ROLLOUT_CONNECT_TIMEOUT") {
        match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => config.connection.timeout_secs = secs,
            _ => warn!(value = %value, "ignoring invalid ROLLOUT_CONNECT_TIMEOUT"),
        }
    }

    // ROLLOUT_PACKAGE_MANAGER
    if let Some(value) = lookup("ROLLOUT_PACKAGE_MANAGER") {
        match value.parse::<PackageManager>() {
            Ok(pm) => config.build.package_manager = pm,
            Err(e) => warn!(error = %e, "ignoring ROLLOUT_PACKAGE_MANAGER"),
        }
    }

    // ROLLOUT_TRANSFER (delta|archive)
    if let Some(value) = lookup("ROLLOUT_TRANSFER") {
        match value.parse::<TransferStrategyKind>() {
            Ok(kind) => config.transfer.prefer_delta = kind == TransferStrategyKind::DeltaSync,
            Err(e) => warn!(error = %e, "ignoring ROLLOUT_TRANSFER"),
        }
    }

    // ROLLOUT_NO_COLOR
    if let Some(value) = lookup("ROLLOUT_NO_COLOR") {
        if !value.is_empty() && value != "0" && value.to_lowercase() != "false" {
            config.output.color = ColorMode::Never;
        }
    }

    config
}

/// Get XDG config directory
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "connection",
        "timeout_secs",
        "strict_host_key_checking",
        "build",
        "package_manager",
        "transfer",
        "prefer_delta",
        "compression_level",
        "output",
        "color",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
