// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn nb_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("submit")
        .stdout_has("wait")
        .stdout_has("synth")
        .stdout_has("classify")
        .stdout_has("runner");
}

#[test]
fn nb_without_command_shows_usage() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn autofix_help_shows_subcommands() {
    cli()
        .args(&["autofix", "--help"])
        .passes()
        .stdout_has("begin")
        .stdout_has("abandon")
        .stdout_has("chain");
}

#[test]
fn nb_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
