// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nb: command-line entry point for the native build pipeline

mod color;
mod commands;
mod exit_error;
mod files;
mod output;
mod remote;
mod table;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::autofix::AutofixArgs;
use commands::diagnose::DiagnoseCommand;
use commands::job::JobCommand;
use commands::local::LocalCommand;
use commands::runner::RunnerArgs;
use exit_error::ExitError;
use nb_client::DaemonClient;
use output::OutputFormat;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Parser)]
#[command(name = "nb", version = VERSION, about = "Native build validation pipeline", styles = color::styles())]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    /// Daemon address (overrides NB_DAEMON_ADDR)
    #[arg(long, global = true)]
    daemon: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Job(JobCommand),

    #[command(flatten)]
    Local(LocalCommand),

    #[command(flatten)]
    Diagnose(DiagnoseCommand),

    /// Drive a job's auto-fix chain
    Autofix(AutofixArgs),

    /// Claim and build queued jobs on this machine
    Runner(RunnerArgs),

    /// Show daemon status
    Status,
}

/// Route tracing to stderr, or stdout for the runner, whose log is its
/// progress report.
fn init_tracing(default_filter: &str, to_stdout: bool) {
    let filter = std::env::var("NB_LOG")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("RUST_LOG").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| default_filter.to_string());
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));
    if to_stdout {
        registry.with(fmt::layer().with_writer(std::io::stdout).with_ansi(std::io::stdout().is_terminal())).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr).with_target(false)).init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = match cli.daemon {
        Some(addr) => match nb_client::env::auth_token() {
            Some(token) => DaemonClient::new(addr).token(token),
            None => DaemonClient::new(addr),
        },
        None => DaemonClient::from_env(),
    };
    let format = cli.output;

    match cli.command {
        Commands::Job(command) => commands::job::handle(command, &client, format).await,
        Commands::Local(command) => commands::local::handle(command, format),
        Commands::Diagnose(DiagnoseCommand::Classify { lines, extract }) => {
            commands::diagnose::handle_local(lines, extract, format)
        }
        Commands::Diagnose(DiagnoseCommand::Stats { id }) => {
            commands::diagnose::handle_stats(&id, &client, format).await
        }
        Commands::Autofix(args) => commands::autofix::handle(args, &client, format).await,
        Commands::Runner(args) => commands::runner::handle(args, client).await,
        Commands::Status => commands::status::handle(&client, format).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Runner(_) => init_tracing("info", true),
        _ => init_tracing("warn", false),
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("{}", exit.message);
                }
                ExitCode::from(exit.code.clamp(0, 255) as u8)
            }
            None => {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
