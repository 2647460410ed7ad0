// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Offline commands: synthesize, package and inspect without a daemon.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use nb_synth::{export, inspect, synthesize, Baseline, ProjectSpec};

use crate::color;
use crate::files;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct ProjectArgs {
    /// Source files or directories (directories contribute every .swift file)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Project name; sanitized into the target name
    #[arg(long)]
    pub name: String,

    /// Application bundle identifier
    #[arg(long, default_value = "com.example.app")]
    pub bundle_id: String,

    /// Development team for signing settings
    #[arg(long)]
    pub team: Option<String>,

    /// Minimum deployment version (used only when above what the sources need)
    #[arg(long, value_parser = parse_baseline)]
    pub baseline: Option<Baseline>,

    /// Privacy usage description (repeatable: --permission KEY=TEXT)
    #[arg(long = "permission", value_parser = parse_key_value)]
    pub permissions: Vec<(String, String)>,
}

impl ProjectArgs {
    fn spec(&self) -> ProjectSpec {
        let mut spec = ProjectSpec::new(&self.name, &self.bundle_id);
        if let Some(team) = &self.team {
            spec = spec.development_team(team.clone());
        }
        if let Some(baseline) = self.baseline {
            spec = spec.deployment_baseline(baseline);
        }
        for (key, text) in &self.permissions {
            spec = spec.permission(key.clone(), text.clone());
        }
        spec
    }
}

#[derive(Subcommand)]
pub enum LocalCommand {
    /// Print the project descriptor synthesized for a set of sources
    Synth {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print the shared scheme instead of the descriptor
        #[arg(long)]
        scheme: bool,
    },
    /// Write the gzip-compressed tar package for a set of sources
    Package {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output path (defaults to <Project>.tar.gz)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Summarize the objects a project descriptor declares
    Inspect {
        /// Path to a project.pbxproj file
        path: PathBuf,
    },
}

/// Parse a key=value string for input arguments.
pub(crate) fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s.find('=').ok_or_else(|| format!("invalid input format '{}': must be key=value", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn parse_baseline(s: &str) -> Result<Baseline, String> {
    Baseline::parse(s).ok_or_else(|| format!("invalid deployment version '{}': expected e.g. 17.0", s))
}

pub fn handle(command: LocalCommand, format: OutputFormat) -> Result<()> {
    match command {
        LocalCommand::Synth { project, scheme } => {
            let files = files::collect(&project.inputs)?;
            let synthesis = synthesize(&files, &project.spec())?;
            format_or_json(format, &synthesis, || {
                if scheme {
                    print!("{}", synthesis.scheme_text);
                } else {
                    print!("{}", synthesis.descriptor_text);
                }
            })?;
        }
        LocalCommand::Package { project, out } => {
            let files = files::collect(&project.inputs)?;
            let (_, package) = export(&files, &project.spec())?;
            let path = out.unwrap_or_else(|| PathBuf::from(&package.filename));
            std::fs::write(&path, &package.bytes).with_context(|| format!("failed to write {}", path.display()))?;
            let obj = serde_json::json!({
                "path": path,
                "bytes": package.bytes.len(),
                "entries": package.entries,
            });
            format_or_json(format, &obj, || {
                println!("Wrote {} ({} bytes)", path.display(), package.bytes.len());
                for entry in &package.entries {
                    println!("  {}", color::muted(entry));
                }
            })?;
        }
        LocalCommand::Inspect { path } => {
            let text =
                std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let inspection = inspect(&text)?;
            format_or_json(format, &inspection, || {
                println!("{} {}", color::header("Objects:"), inspection.object_count);
                for (isa, count) in &inspection.isa_counts {
                    println!("  {isa:<32} {count}");
                }
                println!("{} {}", color::header("Targets:"), inspection.target_names.join(", "));
                println!("{}", color::header("Files:"));
                for file in &inspection.file_paths {
                    println!("  {file}");
                }
                if !inspection.dangling.is_empty() {
                    println!("{} {}", color::header("Dangling:"), inspection.dangling.join(", "));
                }
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
