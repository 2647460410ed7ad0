// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn state_dir_prefers_explicit_override() {
    std::env::set_var("NB_STATE_DIR", "/tmp/nb-state");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/nb-state"));

    std::env::remove_var("NB_STATE_DIR");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/xdg/nb"));
    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial]
fn log_filter_order() {
    std::env::remove_var("NB_LOG");
    std::env::remove_var("RUST_LOG");
    assert_eq!(log_filter(), "info");

    std::env::set_var("RUST_LOG", "warn");
    assert_eq!(log_filter(), "warn");

    std::env::set_var("NB_LOG", "nb_daemon=debug");
    assert_eq!(log_filter(), "nb_daemon=debug");
    std::env::remove_var("NB_LOG");
    std::env::remove_var("RUST_LOG");
}

#[test]
#[serial]
fn listen_addr_and_token() {
    std::env::remove_var("NB_DAEMON_ADDR");
    std::env::set_var("NB_AUTH_TOKEN", "");
    assert_eq!(listen_addr(), DEFAULT_LISTEN_ADDR);
    assert_eq!(auth_token(), None);

    std::env::set_var("NB_DAEMON_ADDR", "0.0.0.0:9000");
    std::env::set_var("NB_AUTH_TOKEN", "s3cret");
    assert_eq!(listen_addr(), "0.0.0.0:9000");
    assert_eq!(auth_token().as_deref(), Some("s3cret"));
    std::env::remove_var("NB_DAEMON_ADDR");
    std::env::remove_var("NB_AUTH_TOKEN");
}
