// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness: temp projects, a spawned daemon and CLI assertions.

#![allow(dead_code)]

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Output, Stdio};

use tempfile::TempDir;

pub const APP_SWIFT: &str = r#"import SwiftUI

@main
struct TodoApp: App {
    var body: some Scene {
        WindowGroup { Text("Todo") }
    }
}
"#;

/// A file whose only error is an undeclared type.
pub const BROKEN_SWIFT: &str = r#"import SwiftUI

struct Broken: View {
    var body: some View { Bar() }
}
"#;

pub const MISSING_BAR: &str = "cannot find 'Bar' in scope";

/// `nb` invoked with no daemon configured.
pub fn cli() -> Cli {
    Cli::new(assert_cmd::cargo::cargo_bin("nb"))
}

/// A scratch directory that also serves as state and config home.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    /// Project with a runnable app in `src/`.
    pub fn todo() -> Self {
        let project = Self::empty();
        project.file("src/App.swift", APP_SWIFT);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn file(&self, rel: &str, content: &str) {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[cfg(unix)]
    pub fn script(&self, rel: &str, content: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        self.file(rel, content);
        let path = self.join(rel);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// `nb` running inside the project, isolated from the user's config.
    pub fn nb(&self) -> Cli {
        cli()
            .current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.join("config"))
            .env("NB_STATE_DIR", self.join("state"))
            .env("NO_COLOR", "1")
    }
}

/// A running `nbd` bound to an ephemeral loopback port.
pub struct Daemon {
    child: Child,
    _stdout: BufReader<ChildStdout>,
    pub addr: String,
}

impl Daemon {
    pub fn start(project: &Project) -> Self {
        let mut child = Command::new(assert_cmd::cargo::cargo_bin("nbd"))
            .env("NB_STATE_DIR", project.join("state"))
            .env("NB_DAEMON_ADDR", "127.0.0.1:0")
            .env_remove("NB_AUTH_TOKEN")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let mut stdout = BufReader::new(child.stdout.take().unwrap());
        let mut line = String::new();
        stdout.read_line(&mut line).unwrap();
        let addr = line.trim().strip_prefix("READY ").unwrap_or_else(|| {
            let _ = child.kill();
            panic!("daemon did not report ready: {line:?}")
        });
        Self { addr: addr.to_string(), child, _stdout: stdout }
    }

    /// `nb` inside `project`, pointed at this daemon.
    pub fn nb(&self, project: &Project) -> Cli {
        project.nb().env("NB_DAEMON_ADDR", &self.addr).env("NB_WAIT_POLL_MS", "50")
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub struct Cli {
    cmd: assert_cmd::Command,
}

impl Cli {
    fn new(program: PathBuf) -> Self {
        let mut cmd = assert_cmd::Command::new(program);
        cmd.env_remove("NB_DAEMON_ADDR").env_remove("NB_LOG").env_remove("RUST_LOG");
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    pub fn output(mut self) -> Output {
        self.cmd.output().unwrap()
    }

    /// Run and require exit code 0.
    pub fn passes(self) -> Run {
        self.exits(0)
    }

    /// Run and require a non-zero exit.
    pub fn fails(self) -> Run {
        let run = Run { output: self.output() };
        assert!(!run.output.status.success(), "expected failure\n{}", run.describe());
        run
    }

    pub fn exits(self, code: i32) -> Run {
        let run = Run { output: self.output() };
        assert_eq!(run.output.status.code(), Some(code), "unexpected exit\n{}", run.describe());
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout lacks {needle:?}\n{}", self.describe());
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout().contains(needle), "stdout has {needle:?}\n{}", self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr lacks {needle:?}\n{}", self.describe());
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).unwrap()
    }

    fn describe(&self) -> String {
        format!("--- stdout\n{}--- stderr\n{}", self.stdout(), self.stderr())
    }
}
