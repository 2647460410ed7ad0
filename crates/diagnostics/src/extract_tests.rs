// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    with_column = { "Foo.swift:12:5: error: cannot find type 'Bar' in scope", "cannot find type 'Bar' in scope" },
    without_column = { "/tmp/x/Foo.swift:3: error: missing return", "missing return" },
    warning = { "Views/Home.swift:1:1: warning: 'foregroundColor' is deprecated", "'foregroundColor' is deprecated" },
    note = { "A.swift:2:2: note: did you mean 'b'?", "did you mean 'b'?" },
    bare_error = { "error: no such module 'Charts'", "no such module 'Charts'" },
    plain = { "  nothing to strip  ", "nothing to strip" },
)]
fn normalize_strips_location(line: &str, expected: &str) {
    assert_eq!(normalize(line), expected);
}

#[test]
fn only_error_lines_are_extracted() {
    let output = "\
CompileSwift normal arm64 /tmp/x/Foo.swift
Foo.swift:12:5: error: cannot find type 'Bar' in scope
Foo.swift:20:1: warning: unused variable 'x'
        let y: Bar = Bar()
** BUILD FAILED **
";
    assert_eq!(extract_errors(output, DEFAULT_ERROR_CAP), vec!["Foo.swift:12:5: error: cannot find type 'Bar' in scope"]);
}

#[test]
fn duplicates_are_dropped_in_order() {
    let output = "A.swift:1:1: error: one\nB.swift:2:2: error: two\nA.swift:1:1: error: one\n";
    assert_eq!(extract_errors(output, 10), vec!["A.swift:1:1: error: one", "B.swift:2:2: error: two"]);
}

#[test]
fn errors_are_capped() {
    let output: String = (0..80).map(|i| format!("F.swift:{i}:1: error: e{i}\n")).collect();
    let errors = extract_errors(&output, DEFAULT_ERROR_CAP);
    assert_eq!(errors.len(), DEFAULT_ERROR_CAP);
    assert_eq!(errors[0], "F.swift:0:1: error: e0");
}

#[test]
fn fatal_errors_count() {
    let output = "App.swift:1:8: fatal error: module 'Foo' not found\n";
    assert_eq!(extract_errors(output, 5).len(), 1);
}
