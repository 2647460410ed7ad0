// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered category table for Swift compiler diagnostics.
//!
//! Patterns are case-insensitive and evaluated in table order; the first
//! category with any matching pattern wins. For symbol-keyed categories the
//! first capture group of the matching pattern is the symbol.

use crate::extract::normalize;
use crate::suggest::suggestion;
use nb_core::{ErrorCategory, RuleTable};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const CATEGORY_TABLE: &[(&[&str], ErrorCategory)] = &[
    (
        &[
            r"(?i)cannot find type '([^']+)' in scope",
            r"(?i)cannot find '([^'$][^']*)' in scope",
            r"(?i)no such module '([^']+)'",
            r"(?i)use of unresolved identifier '([^'$][^']*)'",
            r"(?i)use of undeclared type '([^']+)'",
        ],
        ErrorCategory::MissingImport,
    ),
    (
        &[
            r"Binding<",
            r"(?i)'\$[^']*'",
            r"(?i)property wrapper",
            r"(?i)cannot use mutating member on immutable value",
        ],
        ErrorCategory::BindingError,
    ),
    (
        &[r"(?i)has no (?:dynamic )?member '([^']+)'", r"(?i)'([^']+)' is not a member type of"],
        ErrorCategory::MemberNotFound,
    ),
    (
        &[
            r"(?i)does not conform to (?:protocol|expected type)",
            r"(?i)requires that '[^']+' conform to",
            r"(?i)must conform to",
            r"(?i)does not conform to",
        ],
        ErrorCategory::MissingConformance,
    ),
    (
        &[r"(?i)trailing closure", r"(?i)contextual closure type '[^']+' expects \d+ arguments?"],
        ErrorCategory::TrailingClosure,
    ),
    (
        &[
            r"(?i)missing arguments? for parameters?",
            r"(?i)extra arguments? .*in call",
            r"(?i)incorrect argument labels? in call",
            r"(?i)missing argument labels?",
            r"(?i)argument passed to call that takes no arguments",
            r"(?i)no exact matches in call to",
        ],
        ErrorCategory::ArgumentMismatch,
    ),
    (
        &[
            r"(?i)cannot convert (?:value|return expression) of type",
            r"(?i)cannot assign value of type",
            r"(?i)is not convertible to",
            r"(?i)cannot be applied to operands of type",
            r"(?i)type '[^']+' cannot be used as",
            r"(?i)mismatching types",
        ],
        ErrorCategory::TypeMismatch,
    ),
    (
        &[r"(?i)missing return in", r"(?i)declares an opaque return type, but has no return statements"],
        ErrorCategory::MissingReturn,
    ),
    (
        &[r"(?i)ambiguous use of", r"(?i)ambiguous reference", r"(?i)is ambiguous", r"(?i)ambiguous without"],
        ErrorCategory::AmbiguousReference,
    ),
    (
        &[r"(?i)\bdeprecated\b", r"(?i)was obsoleted", r"(?i)has been renamed to", r"(?i)is unavailable in iOS"],
        ErrorCategory::DeprecatedApi,
    ),
];

#[allow(clippy::expect_used)]
static CATEGORY_RULES: LazyLock<RuleTable<ErrorCategory>> =
    LazyLock::new(|| RuleTable::new(CATEGORY_TABLE).expect("constant regex pattern is valid"));

/// Category of a raw diagnostic line. Total: anything unmatched is `other`.
pub fn classify(raw: &str) -> ErrorCategory {
    let message = normalize(raw);
    CATEGORY_RULES.first(&message).map(|hit| *hit.effect).unwrap_or(ErrorCategory::Other)
}

/// Symbol named by a diagnostic of a symbol-keyed category.
///
/// Uses the same patterns as [`classify`], so `value of type 'Foo' has no
/// member 'bar'` yields `bar`.
pub fn extract_symbol(category: ErrorCategory, message: &str) -> Option<String> {
    if !category.is_symbol_keyed() {
        return None;
    }
    let message = normalize(message);
    let symbol = CATEGORY_RULES
        .captures(&message)
        .find(|(effect, _)| **effect == category)
        .and_then(|(_, caps)| caps.get(1).map(|m| m.as_str().to_string()));
    symbol
}

/// One classified diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub raw: String,
    pub message: String,
    pub category: ErrorCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub suggestion: String,
}

/// Classify a raw line and attach its symbol and suggestion.
pub fn analyze(raw: &str) -> Diagnostic {
    let message = normalize(raw);
    let category = classify(&message);
    Diagnostic {
        raw: raw.to_string(),
        symbol: extract_symbol(category, &message),
        suggestion: suggestion(category, &message),
        category,
        message,
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
