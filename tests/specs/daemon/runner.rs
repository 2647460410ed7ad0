// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end builds through `nb runner` with a scripted toolchain.

#![cfg(unix)]

use crate::prelude::*;

const PASSING_XCODEBUILD: &str = r#"#!/bin/sh
case "$*" in
  *"-scheme Todo"*) echo "** BUILD SUCCEEDED **"; exit 0 ;;
esac
echo "unexpected arguments: $*" >&2
exit 1
"#;

const FAILING_XCODEBUILD: &str = r#"#!/bin/sh
echo "CompileSwift normal arm64"
echo "$(pwd -P)/Todo/App.swift:4:27: error: cannot find 'Bar' in scope"
echo "** BUILD FAILED **"
exit 65
"#;

struct Rig {
    project: Project,
    daemon: Daemon,
}

impl Rig {
    fn new() -> Self {
        let project = Project::todo();
        project.file("fixed/App.swift", APP_SWIFT);
        project.script("bin/pass.sh", PASSING_XCODEBUILD);
        project.script("bin/fail.sh", FAILING_XCODEBUILD);
        let daemon = Daemon::start(&project);
        Self { project, daemon }
    }

    fn nb(&self) -> Cli {
        self.daemon.nb(&self.project)
    }

    fn submit(&self) -> String {
        let run = self.nb().args(&["-o", "json", "submit", "src", "--name", "Todo"]).passes();
        run.json()["id"].as_str().unwrap().to_string()
    }

    /// One `nb runner --once` pass using the named toolchain script.
    fn build_once(&self, script: &str) -> Run {
        self.nb()
            .env("NB_RUNNER_ID", "spec-runner")
            .env("NB_XCODEBUILD", self.project.join(&format!("bin/{script}")))
            .args(&["runner", "--once"])
            .passes()
    }
}

#[test]
fn runner_with_an_empty_queue() {
    let rig = Rig::new();
    rig.build_once("pass.sh").stdout_has("No queued jobs");
}

#[test]
fn successful_build() {
    let rig = Rig::new();
    let id = rig.submit();

    rig.build_once("pass.sh").stdout_has(&format!("{id} succeeded"));

    rig.nb()
        .args(&["logs", &id])
        .passes()
        .stdout_has("Claimed by spec-runner (attempt 1)")
        .stdout_has("** BUILD SUCCEEDED **")
        .stdout_has("Build succeeded");
    rig.nb().args(&["wait", &id]).passes().stdout_has("succeeded after 1 attempt(s)");
}

#[test]
fn failed_build_reports_compiler_errors() {
    let rig = Rig::new();
    let id = rig.submit();

    rig.build_once("fail.sh").stdout_has(&format!("{id} failed"));

    rig.nb()
        .args(&["show", &id])
        .passes()
        .stdout_has("Status: failed")
        .stdout_has("Runner: spec-runner")
        .stdout_has("Compiler errors:")
        .stdout_has("Todo/App.swift:4:27: error: cannot find 'Bar' in scope")
        .stdout_lacks("nb-build-");
    rig.nb().args(&["logs", &id, "-n", "1"]).passes().stdout_has("Build failed with exit code 65 (1 compiler errors)");
    rig.nb().args(&["wait", &id]).exits(1).stdout_has("failed after 1 attempt(s)");
    rig.nb().args(&["stats", &id]).passes().stdout_has("missing_import");
}

#[test]
#[cfg(not(target_os = "macos"))]
fn missing_toolchain_fails_the_job() {
    let rig = Rig::new();
    let id = rig.submit();

    rig.nb()
        .env("PATH", rig.project.join("bin"))
        .env("NB_XCODEBUILD", rig.project.join("bin/absent.sh"))
        .args(&["runner", "--once"])
        .passes().stdout_has(&format!("{id} failed"));

    let run = rig.nb().args(&["-o", "json", "show", &id]).passes();
    let job = run.json();
    assert!(job["error"].as_str().unwrap().contains("xcodebuild not found"), "{job}");
    assert_eq!(job["compilerErrors"], serde_json::json!([]));
    rig.nb().args(&["logs", &id]).passes().stdout_has("Build failed: ");
}

#[test]
fn autofix_chain_reaches_success() {
    let rig = Rig::new();
    let first = rig.submit();
    rig.build_once("fail.sh");

    rig.nb().args(&["autofix", "begin", &first]).passes().stdout_has("Auto-fix started");
    rig.nb().args(&["wait", &first, "--timeout", "1s"]).exits(2).stderr_has("waiting for auto-fix");

    let run = rig.nb().args(&["-o", "json", "autofix", "submit", &first, "fixed"]).passes();
    let second = run.json();
    assert_eq!(second["attempt"], 2);
    assert_eq!(second["previousJobId"], first.as_str());
    let second = second["id"].as_str().unwrap().to_string();

    rig.build_once("pass.sh").stdout_has(&format!("{second} succeeded"));

    rig.nb()
        .args(&["wait", &first])
        .passes()
        .stderr_has("following auto-fix")
        .stdout_has(&format!("{second} succeeded after 2 attempt(s)"));
    rig.nb()
        .args(&["autofix", "chain", &second])
        .passes()
        .stdout_has(&format!("{first}  attempt 1  failed  1 error(s)"))
        .stdout_has(&format!("{second}  attempt 2  succeeded  0 error(s)"));
    rig.nb().args(&["list"]).passes().stdout_has("CHAIN").stdout_has(&format!("→ {second}"));
    rig.nb().args(&["stats", &second]).passes().stdout_has("Resolved: missing_import");
}

#[test]
fn abandoned_chain_ends_failed() {
    let rig = Rig::new();
    let id = rig.submit();
    rig.build_once("fail.sh");

    rig.nb().args(&["autofix", "begin", &id]).passes();
    rig.nb().args(&["autofix", "abandon", &id]).passes().stdout_has("Auto-fix abandoned");
    rig.nb().args(&["wait", &id]).exits(1);
}
