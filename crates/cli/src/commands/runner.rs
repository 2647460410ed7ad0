// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nb runner`: claim and build queued jobs on this machine.

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use nb_client::DaemonClient;
use nb_runner::{Runner, RunnerConfig, XcodebuildExecutor};

#[derive(Args)]
pub struct RunnerArgs {
    /// Build at most one job, then exit
    #[arg(long)]
    pub once: bool,
}

pub async fn handle(args: RunnerArgs, client: DaemonClient) -> Result<()> {
    let config = RunnerConfig::load()?;
    let executor = XcodebuildExecutor::new(config.xcodebuild.clone(), config.build_timeout);
    tracing::info!(
        runner = %config.runner_id,
        daemon = %client.addr(),
        poll_ms = config.poll_interval.as_millis() as u64,
        build_timeout_secs = config.build_timeout.as_secs(),
        "runner configured"
    );
    let runner = Runner::new(client, executor, config);

    if args.once {
        match runner.run_once().await? {
            Some(job) => println!("{} {}", job.id, job.status),
            None => println!("No queued jobs"),
        }
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current job");
            signal.cancel();
        }
    });
    runner.run(shutdown).await;
    Ok(())
}
