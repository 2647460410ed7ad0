// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic commands: classify compiler output and summarize chains.

use std::io::{BufRead, IsTerminal};

use anyhow::Result;
use clap::Subcommand;

use nb_client::DaemonClient;
use nb_core::JobId;
use nb_diagnostics::{analyze, extract_errors, ChainStats, Diagnostic, DEFAULT_ERROR_CAP};
use nb_storage::chain;

use crate::color;
use crate::output::{format_or_json, OutputFormat};
use crate::remote::RemoteStore;
use crate::table::{Column, Table};

#[derive(Subcommand)]
pub enum DiagnoseCommand {
    /// Classify compiler error lines (arguments, or stdin when none given)
    Classify {
        /// Raw error lines
        lines: Vec<String>,

        /// Treat stdin as full compiler output and keep only error lines
        #[arg(long)]
        extract: bool,
    },
    /// Error frequency across the auto-fix chain of a job
    Stats {
        /// Job ID (any attempt in the chain)
        id: String,
    },
}

pub fn handle_local(lines: Vec<String>, extract: bool, format: OutputFormat) -> Result<()> {
    let lines = if lines.is_empty() { read_stdin()? } else { lines };
    let lines = if extract { extract_errors(&lines.join("\n"), DEFAULT_ERROR_CAP) } else { lines };
    let diagnostics: Vec<Diagnostic> = lines.iter().filter(|l| !l.trim().is_empty()).map(|l| analyze(l)).collect();
    format_or_json(format, &diagnostics, || {
        for (i, d) in diagnostics.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{} {}", color::header(&d.category.to_string()), d.message);
            if let Some(symbol) = &d.symbol {
                println!("  {} {}", color::context("Symbol:"), symbol);
            }
            println!("  {} {}", color::context("Fix:"), d.suggestion);
        }
    })
}

fn read_stdin() -> Result<Vec<String>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("no lines given; pass them as arguments or pipe compiler output on stdin");
    }
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        lines.push(line?);
    }
    Ok(lines)
}

pub async fn handle_stats(id: &str, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let store = RemoteStore::new(client);
    let jobs = chain::chain(&store, &JobId::from(id)).await?;
    let stats = ChainStats::from_attempts(jobs.iter().map(|j| j.compiler_errors.iter()));
    let resolved = stats.resolved_categories();

    let obj = serde_json::json!({
        "jobs": jobs.iter().map(|j| j.id.clone()).collect::<Vec<_>>(),
        "stats": stats,
        "resolved": resolved,
    });
    format_or_json(format, &obj, || {
        let mut table = Table::new(vec![Column::muted("JOB"), Column::left("ERRORS"), Column::left("TOP"), Column::status("STATUS")]);
        for (job, attempt) in jobs.iter().zip(&stats.attempts) {
            let top = attempt.top_category().map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
            table.row(vec![job.id.to_string(), attempt.total.to_string(), top, job.status.to_string()]);
        }
        table.render(&mut std::io::stdout());

        if !stats.combined.by_category.is_empty() {
            println!();
            println!("{}", color::header("By category:"));
            for c in &stats.combined.by_category {
                println!("  {:<22} {}", c.category.to_string(), c.count);
            }
        }
        if !resolved.is_empty() {
            let names: Vec<String> = resolved.iter().map(|c| c.to_string()).collect();
            println!();
            println!("{} {}", color::header("Resolved:"), names.join(", "));
        }
    })
}
