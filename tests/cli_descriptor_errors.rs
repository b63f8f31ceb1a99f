//! Commands that need a descriptor fail before any connection attempt.

mod common;

use common::*;

#[test]
fn missing_descriptor_points_at_init() {
    let env = TestEnv::new();
    let result = env.run(&["ps"]);
    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("rollout init"), "{}", result.stderr);
}

#[test]
fn missing_descriptor_in_json_mode_has_kind() {
    let env = TestEnv::new();
    let result = env.run(&["--json", "deploy"]);
    assert!(!result.success);

    let records = result.json_lines();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["event"], "error");
    assert_eq!(records[0]["kind"], "descriptor_not_found");
}

#[test]
fn several_descriptors_need_an_env_flag() {
    let env = TestEnv::new();
    env.write_project_file(".rollout.production.json", VALID_DESCRIPTOR);
    env.write_project_file(".rollout.staging.json", VALID_DESCRIPTOR);

    let result = env.run(&["--json", "logs"]);
    assert!(!result.success);
    let records = result.json_lines();
    assert_eq!(records[0]["kind"], "ambiguous_descriptor");
    let message = records[0]["message"].as_str().unwrap();
    assert!(message.contains(".rollout.production.json"));
    assert!(message.contains(".rollout.staging.json"));
}

#[test]
fn unknown_environment_is_not_found() {
    let env = TestEnv::new();
    env.write_project_file(".rollout.production.json", VALID_DESCRIPTOR);

    let result = env.run(&["--json", "ps", "--env", "qa"]);
    assert!(!result.success);
    assert_eq!(result.json_lines()[0]["kind"], "descriptor_not_found");
}

#[test]
fn descriptor_without_host_is_invalid() {
    let env = TestEnv::new();
    env.write_project_file(".rollout.production.json", MISSING_HOST_DESCRIPTOR);

    let result = env.run(&["deploy"]);
    assert!(!result.success);
    assert!(result.stderr.contains("server.host"), "{}", result.stderr);
}

#[test]
fn malformed_config_is_reported_with_its_file() {
    let env = TestEnv::new();
    env.write_project_file(".rollout/config.toml", "[connection\ntimeout_secs = 5\n");

    let result = env.run(&["--json", "ps"]);
    assert!(!result.success);
    let records = result.json_lines();
    assert_eq!(records[0]["kind"], "config");
}

#[test]
fn unknown_config_key_warns_on_stderr() {
    let env = TestEnv::new();
    env.write_project_file(".rollout/config.toml", "[connection]\ntimout_secs = 5\n");

    let result = env.run(&["ps"]);
    assert!(!result.success);
    assert!(result.stderr.contains("timout_secs"), "{}", result.stderr);
}
