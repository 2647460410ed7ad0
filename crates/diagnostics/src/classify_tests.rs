// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[yare::parameterized(
    missing_type = { "Foo.swift:12:5: error: cannot find type 'Bar' in scope", ErrorCategory::MissingImport },
    missing_value = { "cannot find 'Haptics' in scope", ErrorCategory::MissingImport },
    no_module = { "error: no such module 'Charts'", ErrorCategory::MissingImport },
    dollar_name = { "cannot find '$text' in scope", ErrorCategory::BindingError },
    binding_convert = {
        "cannot convert value of type 'String' to expected argument type 'Binding<String>'",
        ErrorCategory::BindingError
    },
    member = { "value of type 'Foo' has no member 'bar'", ErrorCategory::MemberNotFound },
    static_member = { "type 'Color' has no member 'primaryBrand'", ErrorCategory::MemberNotFound },
    conformance = {
        "type 'Item' does not conform to protocol 'Identifiable'",
        ErrorCategory::MissingConformance
    },
    requires_conform = {
        "referencing initializer 'init(_:content:)' on 'ForEach' requires that 'Item' conform to 'Identifiable'",
        ErrorCategory::MissingConformance
    },
    trailing = { "extra trailing closure passed in call", ErrorCategory::TrailingClosure },
    contextual = {
        "contextual closure type '() -> Void' expects 0 arguments, but 1 was used in closure body",
        ErrorCategory::TrailingClosure
    },
    missing_arg = { "missing argument for parameter 'title' in call", ErrorCategory::ArgumentMismatch },
    extra_arg = { "extra argument 'color' in call", ErrorCategory::ArgumentMismatch },
    labels = { "incorrect argument label in call (have 'name:', expected 'title:')", ErrorCategory::ArgumentMismatch },
    convert = { "cannot convert value of type 'Int' to expected argument type 'String'", ErrorCategory::TypeMismatch },
    assign = { "cannot assign value of type 'String' to type 'Int'", ErrorCategory::TypeMismatch },
    missing_return = { "missing return in instance method expected to return 'Int'", ErrorCategory::MissingReturn },
    ambiguous = { "ambiguous use of 'init'", ErrorCategory::AmbiguousReference },
    ambiguous_context = { "type of expression is ambiguous without more context", ErrorCategory::AmbiguousReference },
    deprecated = {
        "Home.swift:4:10: warning: 'foregroundColor' is deprecated in iOS 17.0",
        ErrorCategory::DeprecatedApi
    },
    renamed = { "'autocapitalization' has been renamed to 'textInputAutocapitalization'", ErrorCategory::DeprecatedApi },
    unknown = { "linker command failed with exit code 1", ErrorCategory::Other },
    empty = { "", ErrorCategory::Other },
)]
fn classification(raw: &str, expected: ErrorCategory) {
    assert_eq!(classify(raw), expected);
}

#[test]
fn matching_is_case_insensitive() {
    assert_eq!(classify("CANNOT FIND TYPE 'Bar' IN SCOPE"), ErrorCategory::MissingImport);
}

#[test]
fn member_symbol_is_extracted() {
    let raw = "value of type 'Foo' has no member 'bar'";
    assert_eq!(classify(raw), ErrorCategory::MemberNotFound);
    assert_eq!(extract_symbol(ErrorCategory::MemberNotFound, raw).as_deref(), Some("bar"));
}

#[yare::parameterized(
    type_in_scope = { "Foo.swift:12:5: error: cannot find type 'Bar' in scope", "Bar" },
    value_in_scope = { "cannot find 'PhotosPicker' in scope", "PhotosPicker" },
    module = { "no such module 'Charts'", "Charts" },
)]
fn import_symbol(raw: &str, expected: &str) {
    assert_eq!(extract_symbol(ErrorCategory::MissingImport, raw).as_deref(), Some(expected));
}

#[test]
fn non_symbol_categories_have_no_symbol() {
    let raw = "cannot convert value of type 'Int' to expected argument type 'String'";
    assert_eq!(extract_symbol(ErrorCategory::TypeMismatch, raw), None);
    assert_eq!(extract_symbol(ErrorCategory::MemberNotFound, raw), None);
}

#[test]
fn analyze_combines_everything() {
    let diagnostic = analyze("Foo.swift:12:5: error: cannot find type 'Bar' in scope");
    assert_eq!(diagnostic.message, "cannot find type 'Bar' in scope");
    assert_eq!(diagnostic.category, ErrorCategory::MissingImport);
    assert_eq!(diagnostic.symbol.as_deref(), Some("Bar"));
    assert!(diagnostic.suggestion.contains("import the module"));
}

proptest! {
    #[test]
    fn classify_is_total_and_deterministic(raw in ".{0,200}") {
        let first = classify(&raw);
        prop_assert_eq!(first, classify(&raw));
        prop_assert!(ErrorCategory::ALL.contains(&first));
    }
}
