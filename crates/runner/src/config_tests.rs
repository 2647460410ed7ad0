// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
fn empty_file_keeps_defaults() {
    let config = RunnerConfig::from_toml("").unwrap();
    assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    assert_eq!(config.build_timeout, Duration::from_secs(1800));
    assert_eq!(config.max_compiler_errors, 50);
    assert!(config.runner_id.starts_with("runner-"));
    assert_eq!(config.xcodebuild, None);
}

#[test]
fn file_values_override_defaults() {
    let config = RunnerConfig::from_toml(
        r#"
runner_id = "mac-mini-1"
poll_ms = 500
log_flush_ms = 250
build_timeout_secs = 60
xcodebuild = "/opt/xcode/xcodebuild"
max_compiler_errors = 10
"#,
    )
    .unwrap();
    assert_eq!(config.runner_id, "mac-mini-1");
    assert_eq!(config.poll_interval, Duration::from_millis(500));
    assert_eq!(config.log_flush_interval, Duration::from_millis(250));
    assert_eq!(config.build_timeout, Duration::from_secs(60));
    assert_eq!(config.xcodebuild, Some(PathBuf::from("/opt/xcode/xcodebuild")));
    assert_eq!(config.max_compiler_errors, 10);
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(RunnerConfig::from_toml("pol_ms = 5").is_err());
}

#[test]
#[serial]
fn environment_wins_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runner.toml");
    std::fs::write(&path, "runner_id = \"from-file\"\npoll_ms = 100\n").unwrap();

    std::env::set_var("NB_RUNNER_CONFIG", &path);
    std::env::set_var("NB_RUNNER_ID", "from-env");
    let config = RunnerConfig::load().unwrap();
    std::env::remove_var("NB_RUNNER_CONFIG");
    std::env::remove_var("NB_RUNNER_ID");

    assert_eq!(config.runner_id, "from-env");
    assert_eq!(config.poll_interval, Duration::from_millis(100));
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    std::env::set_var("NB_RUNNER_CONFIG", "/nonexistent/nb/runner.toml");
    let err = RunnerConfig::load().unwrap_err();
    std::env::remove_var("NB_RUNNER_CONFIG");
    assert!(matches!(err, ConfigError::Read { .. }), "{err:?}");
}

#[test]
fn parse_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runner.toml");
    std::fs::write(&path, "poll_ms = \"soon\"").unwrap();
    let err = RunnerConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("runner.toml"));
}
