// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn defaults_apply_when_unset() {
    std::env::remove_var("NB_DAEMON_ADDR");
    std::env::remove_var("NB_AUTH_TOKEN");
    std::env::remove_var("NB_IPC_TIMEOUT_MS");
    std::env::remove_var("NB_WAIT_POLL_MS");
    assert_eq!(daemon_addr(), DEFAULT_DAEMON_ADDR);
    assert_eq!(auth_token(), None);
    assert_eq!(ipc_timeout(), Duration::from_secs(5));
    assert_eq!(wait_poll_interval(), Duration::from_secs(3));
}

#[test]
#[serial]
fn overrides_and_bad_values() {
    std::env::set_var("NB_DAEMON_ADDR", "10.0.0.2:9000");
    std::env::set_var("NB_AUTH_TOKEN", "");
    std::env::set_var("NB_IPC_TIMEOUT_MS", "250");
    std::env::set_var("NB_WAIT_POLL_MS", "soon");
    assert_eq!(daemon_addr(), "10.0.0.2:9000");
    assert_eq!(auth_token(), None, "empty token counts as unset");
    assert_eq!(ipc_timeout(), Duration::from_millis(250));
    assert_eq!(wait_poll_interval(), Duration::from_secs(3));
    std::env::remove_var("NB_DAEMON_ADDR");
    std::env::remove_var("NB_IPC_TIMEOUT_MS");
    std::env::remove_var("NB_WAIT_POLL_MS");
    std::env::remove_var("NB_AUTH_TOKEN");
}
