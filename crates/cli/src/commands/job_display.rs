// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text rendering for jobs.

use std::io::Write;

use nb_core::BuildJob;
use nb_wire::JobSummary;

use crate::color;
use crate::output::format_time_ago;
use crate::table::{Column, Table};

pub(crate) fn format_job_list(out: &mut (impl Write + ?Sized), jobs: &[JobSummary]) {
    if jobs.is_empty() {
        let _ = writeln!(out, "No jobs");
        return;
    }

    // Show CHAIN column only when some job continues as another
    let show_chain = jobs.iter().any(|j| j.next_job_id.is_some() || j.auto_fix_in_progress);

    let mut cols = vec![
        Column::muted("ID"),
        Column::left("PROJECT"),
        Column::left("ATTEMPT"),
        Column::left("ERRORS"),
        Column::left("RUNNER"),
        Column::left("CREATED"),
    ];
    if show_chain {
        cols.push(Column::left("CHAIN"));
    }
    cols.push(Column::status("STATUS"));

    let mut table = Table::new(cols);
    for j in jobs {
        let mut cells = vec![
            j.id.to_string(),
            j.project_name.clone(),
            j.attempt.to_string(),
            j.error_count.to_string(),
            j.runner.clone().unwrap_or_else(|| "-".to_string()),
            format_time_ago(j.created_at_ms),
        ];
        if show_chain {
            cells.push(chain_cell(j));
        }
        cells.push(j.status.to_string());
        table.row(cells);
    }
    table.render(out);
}

fn chain_cell(job: &JobSummary) -> String {
    match (&job.next_job_id, job.auto_fix_in_progress) {
        (Some(next), _) => format!("→ {next}"),
        (None, true) => "fixing".to_string(),
        (None, false) => "-".to_string(),
    }
}

pub(crate) fn print_job(job: &BuildJob) {
    println!("{} {}", color::header("Job:"), job.id);
    println!("  {} {}", color::context("Project:"), job.request.project_name);
    println!("  {} {}", color::context("Bundle:"), job.request.bundle_id);
    println!("  {} {}", color::context("Status:"), color::status(&job.status.to_string()));
    println!("  {} {}", color::context("Attempt:"), job.attempt);
    println!("  {} {}", color::context("Files:"), job.request.files.len());
    if let Some(runner) = &job.runner {
        println!("  {} {}", color::context("Runner:"), runner);
    }
    if let Some(previous) = &job.previous_job_id {
        println!("  {} {}", color::context("Previous:"), previous);
    }
    if let Some(next) = &job.next_job_id {
        println!("  {} {}", color::context("Next:"), next);
    }
    if job.auto_fix_in_progress {
        println!("  {} in progress", color::context("Auto-fix:"));
    }
    println!("  {} {}", color::context("Updated:"), format_time_ago(job.updated_at_ms));
    if let Some(error) = &job.error {
        println!();
        println!("  {} {}", color::context("Error:"), error);
    }
    if !job.compiler_errors.is_empty() {
        println!();
        println!("  {}", color::header("Compiler errors:"));
        for line in &job.compiler_errors {
            println!("    {line}");
        }
    }
}
