// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nb autofix`: drive an auto-fix chain by hand.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use nb_client::DaemonClient;
use nb_core::JobId;
use nb_storage::{chain, AutoFixPolicy, DEFAULT_MAX_ATTEMPTS};

use crate::files;
use crate::output::{format_or_json, OutputFormat};
use crate::remote::RemoteStore;

#[derive(Args)]
pub struct AutofixArgs {
    /// Maximum builds per chain, counting the first
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[command(subcommand)]
    pub command: AutofixCommand,
}

#[derive(Subcommand)]
pub enum AutofixCommand {
    /// Mark a failed job as having a fix in progress
    Begin {
        /// Failed job ID
        id: String,
    },
    /// Give up on fixing a job; its chain ends as failed
    Abandon {
        /// Job ID
        id: String,
    },
    /// Submit corrected sources as the next attempt of a failed job
    Submit {
        /// Failed job ID
        id: String,

        /// Corrected source files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// List every attempt in a job's chain
    Chain {
        /// Job ID (any attempt in the chain)
        id: String,
    },
}

pub async fn handle(args: AutofixArgs, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let store = RemoteStore::new(client);
    let policy = AutoFixPolicy::new(args.max_attempts);
    match args.command {
        AutofixCommand::Begin { id } => {
            let job = chain::begin(&store, &policy, &JobId::from(id.as_str())).await?;
            format_or_json(format, &job, || {
                println!("Auto-fix started for {} (attempt {} of {})", job.id, job.attempt, policy.max_attempts)
            })?;
        }
        AutofixCommand::Abandon { id } => {
            let job = chain::abandon(&store, &JobId::from(id.as_str())).await?;
            format_or_json(format, &job, || println!("Auto-fix abandoned for {}", job.id))?;
        }
        AutofixCommand::Submit { id, inputs } => {
            let files = files::collect(&inputs)?;
            let job = chain::submit_fix(&store, &policy, &JobId::from(id.as_str()), files).await?;
            format_or_json(format, &job, || {
                println!("Submitted {} (attempt {}, follows {})", job.id, job.attempt, id)
            })?;
        }
        AutofixCommand::Chain { id } => {
            let jobs = chain::chain(&store, &JobId::from(id.as_str())).await?;
            format_or_json(format, &jobs, || {
                for job in &jobs {
                    let errors = job.compiler_errors.len();
                    println!("{}  attempt {}  {}  {} error(s)", job.id, job.attempt, job.status, errors);
                }
            })?;
        }
    }
    Ok(())
}
