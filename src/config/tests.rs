//! Tests for the config module

use super::loader::{apply_env_overrides, load_with_warnings, merge};
use super::types::*;
use crate::domain::value_objects::PackageManager;
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.connection.timeout_secs, 30);
    assert_eq!(config.connection.strict_host_key_checking, "accept-new");
    assert_eq!(config.build.package_manager, PackageManager::Npm);
    assert!(config.transfer.prefer_delta);
    assert_eq!(config.transfer.compression_level, 1);
    assert_eq!(config.output.color, ColorMode::Auto);
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
[connection]
timeout_secs = 10
strict_host_key_checking = "yes"

[build]
package_manager = "pnpm"

[transfer]
prefer_delta = false
compression_level = 9

[output]
color = "never"
"#;

    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(config.connection.timeout().as_secs(), 10);
    assert_eq!(config.connection.strict_host_key_checking, "yes");
    assert_eq!(config.build.package_manager, PackageManager::Pnpm);
    assert!(!config.transfer.prefer_delta);
    assert_eq!(config.transfer.compression_level, 9);
    assert_eq!(config.output.color, ColorMode::Never);
}

#[test]
fn test_partial_section_keeps_defaults() {
    let config: Config = toml::from_str("[transfer]\ncompression_level = 4\n").unwrap();
    assert!(config.transfer.prefer_delta);
    assert_eq!(config.connection.timeout_secs, 30);
}

#[test]
fn test_unknown_keys_become_warnings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[transfer]\nprefer_detla = false\n").unwrap();

    let (config, warnings) = load_with_warnings(&path).unwrap();

    assert!(config.transfer.prefer_delta);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "prefer_detla");
    assert_eq!(warnings[0].line, Some(2));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("prefer_delta"));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[connection]\ntimeout_secs = \"soon\"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert_eq!(err.kind(), "config");
}

#[test]
fn test_project_layer_overrides_user_layer_per_key() {
    let mut base: toml::Table = toml::from_str(
        "[connection]\ntimeout_secs = 5\nstrict_host_key_checking = \"no\"\n",
    )
    .unwrap();
    let overlay: toml::Table = toml::from_str("[connection]\ntimeout_secs = 60\n").unwrap();

    merge(&mut base, overlay);
    let config: Config = toml::Value::Table(base).try_into().unwrap();

    assert_eq!(config.connection.timeout_secs, 60);
    assert_eq!(config.connection.strict_host_key_checking, "no");
}

#[test]
fn test_layered_load_reads_project_config() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".rollout")).unwrap();
    fs::write(
        dir.path().join(".rollout/config.toml"),
        "[build]\npackage_manager = \"yarn\"\n",
    )
    .unwrap();

    let (config, warnings) = Config::load_layered(dir.path()).unwrap();
    assert!(warnings.iter().all(|w| w.key != "package_manager"));
    assert_eq!(config.build.package_manager, PackageManager::Yarn);
}

#[test]
fn test_env_overrides() {
    let config = apply_env_overrides(
        Config::default(),
        env(&[
            ("ROLLOUT_CONNECT_TIMEOUT", "12"),
            ("ROLLOUT_PACKAGE_MANAGER", "pnpm"),
            ("ROLLOUT_TRANSFER", "archive"),
            ("ROLLOUT_NO_COLOR", "1"),
        ]),
    );

    assert_eq!(config.connection.timeout_secs, 12);
    assert_eq!(config.build.package_manager, PackageManager::Pnpm);
    assert!(!config.transfer.prefer_delta);
    assert_eq!(config.output.color, ColorMode::Never);
}

#[test]
fn test_invalid_env_values_are_ignored() {
    let config = apply_env_overrides(
        Config::default(),
        env(&[
            ("ROLLOUT_CONNECT_TIMEOUT", "0"),
            ("ROLLOUT_PACKAGE_MANAGER", "bower"),
            ("ROLLOUT_TRANSFER", "ftp"),
            ("ROLLOUT_NO_COLOR", "0"),
        ]),
    );

    assert_eq!(config, Config::default());
}
