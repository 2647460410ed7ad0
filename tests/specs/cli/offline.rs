// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands that run without a daemon.

use std::collections::BTreeSet;
use std::io::Read;

use crate::prelude::*;

#[test]
fn synth_prints_the_descriptor() {
    let project = Project::todo();
    project
        .nb()
        .args(&["synth", "src", "--name", "Todo"])
        .passes()
        .stdout_has("// !$*UTF8*$!")
        .stdout_has("PBXNativeTarget")
        .stdout_has("Todo/App.swift");
}

#[test]
fn synth_scheme_names_the_app() {
    let project = Project::todo();
    project
        .nb()
        .args(&["synth", "src", "--name", "my todo", "--scheme"])
        .passes()
        .stdout_has("BuildableName = \"MyTodo.app\"");
}

#[test]
fn synth_without_swift_sources_fails() {
    let project = Project::empty();
    project.file("notes/README.md", "# notes");
    project.nb().args(&["synth", "notes", "--name", "Todo"]).fails().stderr_has("no Swift source files");
}

#[test]
fn package_writes_a_loadable_archive() {
    let project = Project::todo();
    project.file("src/Views/Home.swift", "import SwiftUI");
    let out = project.join("Todo.tar.gz");

    project
        .nb()
        .args(&["package", "src", "--name", "Todo", "--out", out.to_str().unwrap()])
        .passes()
        .stdout_has("Wrote");

    let bytes = std::fs::read(&out).unwrap();
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(bytes.as_slice()));
    let mut paths = BTreeSet::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let path = entry.path().unwrap().to_string_lossy().into_owned();
        if path == "Todo/App.swift" {
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            assert_eq!(content, APP_SWIFT);
        }
        paths.insert(path);
    }
    assert!(paths.contains("Todo.xcodeproj/project.pbxproj"));
    assert!(paths.contains("Todo.xcodeproj/xcshareddata/xcschemes/Todo.xcscheme"));
    assert!(paths.contains("Todo/Views/Home.swift"));
}

#[test]
fn package_is_reproducible() {
    let project = Project::todo();
    for out in ["first.tar.gz", "second.tar.gz"] {
        project.nb().args(&["package", "src", "--name", "Todo", "--out", out]).passes();
    }
    let first = std::fs::read(project.join("first.tar.gz")).unwrap();
    let second = std::fs::read(project.join("second.tar.gz")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn inspect_reads_back_a_descriptor() {
    let project = Project::todo();
    let descriptor = project.nb().args(&["synth", "src", "--name", "Todo"]).passes().stdout();
    project.file("project.pbxproj", &descriptor);

    let run = project.nb().args(&["-o", "json", "inspect", "project.pbxproj"]).passes();
    let inspection = run.json();
    assert_eq!(inspection["targetNames"], serde_json::json!(["Todo"]));
    assert_eq!(inspection["filePaths"], serde_json::json!(["Todo/App.swift"]));
    assert_eq!(inspection["dangling"], serde_json::json!([]));
}

#[test]
fn classify_argument_line() {
    cli()
        .args(&["classify", "Foo.swift:12:5: error: cannot find type 'Bar' in scope"])
        .env("NO_COLOR", "1")
        .passes()
        .stdout_has("missing_import")
        .stdout_has("Symbol: Bar");
}

#[test]
fn classify_extracts_errors_from_stdin() {
    let log = "CompileSwift normal arm64\n\
               App.swift:3:5: error: cannot find 'Bar' in scope\n\
               App.swift:4:1: warning: unused variable\n\
               ** BUILD FAILED **\n";
    let run = cli().args(&["-o", "json", "classify", "--extract"]).stdin(log).passes();
    let diagnostics = run.json();
    let diagnostics = diagnostics.as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["category"], "missing_import");
}
