// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nb status`: daemon overview.

use anyhow::Result;

use nb_client::DaemonClient;

use crate::color;
use crate::output::{format_or_json, OutputFormat};

pub async fn handle(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let status = client.status().await?;
    format_or_json(format, &status, || {
        println!("{} {} ({})", color::header("Daemon:"), client.addr(), status.version);
        println!("  {} {}", color::context("Uptime:"), nb_core::format_elapsed(status.uptime_secs));
        println!("  {} {}", color::context("Jobs:"), status.jobs_total);
        println!("    {:<10} {}", "queued", status.queued);
        println!("    {:<10} {}", "running", status.running);
        println!("    {:<10} {}", "succeeded", status.succeeded);
        println!("    {:<10} {}", "failed", status.failed);
    })
}
