// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nb_core::test_support::APP_SWIFT;

fn todo_files() -> Vec<SourceFile> {
    vec![SourceFile::new("App.swift", APP_SWIFT), SourceFile::new("Views/Home.swift", "import SwiftUI")]
}

fn todo_spec() -> ProjectSpec {
    ProjectSpec::new("Todo", "com.example.todo")
}

#[test]
fn layout_of_a_simple_project() {
    let (_, package) = export(&todo_files(), &todo_spec()).unwrap();

    assert_eq!(package.filename, "Todo.tar.gz");
    assert_eq!(
        package.entries,
        vec![
            "Todo.xcodeproj/project.pbxproj",
            "Todo.xcodeproj/xcshareddata/xcschemes/Todo.xcscheme",
            "Todo/App.swift",
            "Todo/Views/Home.swift",
        ]
    );

    let entries = read_entries(&package.bytes).unwrap();
    assert_eq!(entries.keys().cloned().collect::<Vec<_>>(), package.entries);
    assert_eq!(entries.get("Todo/App.swift").map(Vec::as_slice), Some(APP_SWIFT.as_bytes()));
}

#[test]
fn headers_are_normalized() {
    let (_, package) = export(&todo_files(), &todo_spec()).unwrap();
    let mut archive = Archive::new(GzDecoder::new(package.bytes.as_slice()));
    for entry in archive.entries().unwrap() {
        let entry = entry.unwrap();
        let header = entry.header();
        assert_eq!(header.mtime().unwrap(), 0);
        assert_eq!(header.uid().unwrap(), 0);
        assert_eq!(header.gid().unwrap(), 0);
        assert_eq!(header.mode().unwrap(), 0o644);
    }
}

#[test]
fn same_inputs_same_bytes() {
    let (_, first) = export(&todo_files(), &todo_spec()).unwrap();
    let mut reversed = todo_files();
    reversed.reverse();
    let (_, second) = export(&reversed, &todo_spec()).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn no_swift_files_produces_no_archive() {
    let files = vec![SourceFile::new("README.md", "# Todo")];
    let err = export(&files, &todo_spec()).unwrap_err();
    assert!(matches!(err, PackageError::NoSourceFiles));

    let synthesis = synthesize(&todo_files(), &todo_spec()).unwrap();
    let err = package(&synthesis, &files).unwrap_err();
    assert!(matches!(err, PackageError::NoSourceFiles));
}

#[test]
fn synthesized_widget_files_are_packaged() {
    let files = vec![
        SourceFile::new("App.swift", APP_SWIFT),
        SourceFile::new("Delivery.swift", "import ActivityKit\nstruct DeliveryAttributes: ActivityAttributes {}"),
    ];
    let (_, package) = export(&files, &todo_spec()).unwrap();
    for expected in [
        "Todo/TodoWidget/Info.plist",
        "Todo/TodoWidget/TodoLiveActivity.swift",
        "Todo/TodoWidget/TodoWidgetBundle.swift",
    ] {
        assert!(package.entries.iter().any(|e| e == expected), "missing {expected}");
    }
}

#[test]
fn descriptor_referencing_a_missing_file_is_rejected() {
    let synthesis = synthesize(&todo_files(), &todo_spec()).unwrap();
    let only_app = vec![SourceFile::new("App.swift", APP_SWIFT)];
    let err = package(&synthesis, &only_app).unwrap_err();
    match err {
        PackageError::InvalidDescriptor(message) => assert!(message.contains("Todo/Views/Home.swift")),
        other => panic!("expected InvalidDescriptor, got {other:?}"),
    }
}

#[test]
fn dangling_identifier_is_rejected() {
    let mut synthesis = synthesize(&todo_files(), &todo_spec()).unwrap();
    synthesis.descriptor_text = synthesis.descriptor_text.replacen(
        "mainGroup = ",
        "mainGroup = 000000000000000000000000; unused = ",
        1,
    );
    let err = package(&synthesis, &todo_files()).unwrap_err();
    assert!(matches!(err, PackageError::InvalidDescriptor(_)), "{err:?}");
}

#[test]
fn unpack_writes_the_tree() {
    let (_, package) = export(&todo_files(), &todo_spec()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    unpack(&package.bytes, dir.path()).unwrap();

    assert!(dir.path().join("Todo.xcodeproj/project.pbxproj").is_file());
    assert!(dir.path().join("Todo/Views/Home.swift").is_file());
    let app = std::fs::read_to_string(dir.path().join("Todo/App.swift")).unwrap();
    assert_eq!(app, APP_SWIFT);
}

#[test]
fn content_disposition_quotes_the_name() {
    assert_eq!(content_disposition("Todo.tar.gz"), "attachment; filename=\"Todo.tar.gz\"");
    assert_eq!(archive_filename("MyApp"), "MyApp.tar.gz");
}
