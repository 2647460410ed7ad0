// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job submission and queries against a live daemon.

use crate::prelude::*;

fn submit(daemon: &Daemon, project: &Project) -> String {
    let run = daemon.nb(project).args(&["-o", "json", "submit", "src", "--name", "Todo"]).passes();
    run.json()["id"].as_str().unwrap().to_string()
}

#[test]
fn job_list_empty() {
    let project = Project::todo();
    let daemon = Daemon::start(&project);
    daemon.nb(&project).args(&["list"]).passes().stdout_eq("No jobs\n");
}

#[test]
fn submitted_job_is_queued() {
    let project = Project::todo();
    let daemon = Daemon::start(&project);
    daemon
        .nb(&project)
        .args(&["submit", "src", "--name", "Todo"])
        .passes()
        .stdout_has("Submitted")
        .stdout_has("attempt 1, 1 files");

    daemon
        .nb(&project)
        .args(&["list"])
        .passes()
        .stdout_has("PROJECT")
        .stdout_has("Todo")
        .stdout_has("queued")
        .stdout_lacks("CHAIN");
}

#[test]
fn show_reports_the_request() {
    let project = Project::todo();
    let daemon = Daemon::start(&project);
    let id = submit(&daemon, &project);

    daemon
        .nb(&project)
        .args(&["show", &id])
        .passes()
        .stdout_has(&format!("Job: {id}"))
        .stdout_has("Bundle: com.example.app")
        .stdout_has("Status: queued");
}

#[test]
fn show_unknown_job_fails() {
    let project = Project::todo();
    let daemon = Daemon::start(&project);
    daemon.nb(&project).args(&["show", "job-missing"]).fails().stderr_has("job not found");
}

#[test]
fn list_filters_by_status() {
    let project = Project::todo();
    let daemon = Daemon::start(&project);
    submit(&daemon, &project);

    daemon.nb(&project).args(&["list", "--status", "failed"]).passes().stdout_eq("No jobs\n");
    daemon.nb(&project).args(&["list", "--status", "done"]).fails().stderr_has("unknown status");
}

#[test]
fn archive_downloads_the_package() {
    let project = Project::todo();
    let daemon = Daemon::start(&project);
    let id = submit(&daemon, &project);

    daemon.nb(&project).args(&["archive", &id, "--out", "job.tar.gz"]).passes().stdout_has("Wrote job.tar.gz");
    let local = project.join("local.tar.gz");
    project.nb().args(&["package", "src", "--name", "Todo", "--out", local.to_str().unwrap()]).passes();
    assert_eq!(std::fs::read(project.join("job.tar.gz")).unwrap(), std::fs::read(local).unwrap());
}

#[test]
fn status_counts_jobs() {
    let project = Project::todo();
    let daemon = Daemon::start(&project);
    submit(&daemon, &project);
    submit(&daemon, &project);

    let run = daemon.nb(&project).args(&["-o", "json", "status"]).passes();
    let status = run.json();
    assert_eq!(status["jobs_total"], 2);
    assert_eq!(status["queued"], 2);
}

#[test]
fn wait_times_out_on_a_queued_job() {
    let project = Project::todo();
    let daemon = Daemon::start(&project);
    let id = submit(&daemon, &project);

    daemon.nb(&project).args(&["wait", &id, "--timeout", "1s"]).exits(2).stderr_has("timed out");
}

#[test]
fn commands_fail_without_a_daemon() {
    let project = Project::todo();
    project
        .nb()
        .env("NB_DAEMON_ADDR", "127.0.0.1:1")
        .env("NB_IPC_TIMEOUT_MS", "500")
        .args(&["list"])
        .fails()
        .stderr_has("error:");
}
