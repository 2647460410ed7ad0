// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nb_core::test_support::todo_request;
use nb_storage::JobStore;
use tempfile::tempdir;

fn test_config(dir: &std::path::Path) -> Config {
    Config::for_state_dir(dir.to_path_buf(), "127.0.0.1:0")
}

#[test]
fn paths_live_under_the_state_dir() {
    let config = Config::for_state_dir(PathBuf::from("/var/nb"), "127.0.0.1:7717");
    assert_eq!(config.lock_path, PathBuf::from("/var/nb/daemon.pid"));
    assert_eq!(config.log_path, PathBuf::from("/var/nb/daemon.log"));
    assert_eq!(config.snapshot_path, PathBuf::from("/var/nb/jobs.json"));
}

#[tokio::test]
async fn startup_writes_pid_and_version() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let mut daemon = startup(&config).await.unwrap();

    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    assert_eq!(std::fs::read_to_string(&config.version_path).unwrap(), crate::env::DAEMON_VERSION);
    assert!(daemon.listener.is_some());

    daemon.shutdown().unwrap();
    assert!(!config.lock_path.exists());
    assert!(!config.version_path.exists());
}

#[tokio::test]
async fn second_daemon_cannot_take_the_lock() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let _running = startup(&config).await.unwrap();

    let err = startup(&config).await.err().unwrap();
    assert!(matches!(err, LifecycleError::LockFailed(_)), "{err:?}");
    assert!(config.lock_path.exists(), "running daemon's PID file is left alone");
}

#[tokio::test]
async fn jobs_survive_a_restart() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    let job = {
        let mut daemon = startup(&config).await.unwrap();
        let job = daemon.store.submit(todo_request()).await.unwrap();
        daemon.shutdown().unwrap();
        job
    };

    let daemon = startup(&config).await.unwrap();
    let reloaded = daemon.store.get(&job.id).await.unwrap().unwrap();
    assert_eq!(reloaded, job);
}

#[tokio::test]
async fn bind_failure_cleans_up() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.listen_addr = "not an address".to_string();

    let err = startup(&config).await.err().unwrap();
    assert!(matches!(err, LifecycleError::BindFailed(..)), "{err:?}");
    assert!(!config.lock_path.exists());
}
