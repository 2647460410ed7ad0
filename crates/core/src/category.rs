// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiler diagnostic categories.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Closed taxonomy of compiler diagnostics.
///
/// Declaration order is the classifier's evaluation order for ties in
/// ranked statistics; it is not the rule-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    MissingImport,
    TypeMismatch,
    TrailingClosure,
    MissingConformance,
    MemberNotFound,
    MissingReturn,
    AmbiguousReference,
    ArgumentMismatch,
    DeprecatedApi,
    BindingError,
    Other,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 11] = [
        ErrorCategory::MissingImport,
        ErrorCategory::TypeMismatch,
        ErrorCategory::TrailingClosure,
        ErrorCategory::MissingConformance,
        ErrorCategory::MemberNotFound,
        ErrorCategory::MissingReturn,
        ErrorCategory::AmbiguousReference,
        ErrorCategory::ArgumentMismatch,
        ErrorCategory::DeprecatedApi,
        ErrorCategory::BindingError,
        ErrorCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::MissingImport => "missing_import",
            ErrorCategory::TypeMismatch => "type_mismatch",
            ErrorCategory::TrailingClosure => "trailing_closure",
            ErrorCategory::MissingConformance => "missing_conformance",
            ErrorCategory::MemberNotFound => "member_not_found",
            ErrorCategory::MissingReturn => "missing_return",
            ErrorCategory::AmbiguousReference => "ambiguous_reference",
            ErrorCategory::ArgumentMismatch => "argument_mismatch",
            ErrorCategory::DeprecatedApi => "deprecated_api",
            ErrorCategory::BindingError => "binding_error",
            ErrorCategory::Other => "other",
        }
    }

    /// Whether a fix for this category is keyed on a symbol name.
    pub fn is_symbol_keyed(&self) -> bool {
        matches!(self, ErrorCategory::MissingImport | ErrorCategory::MemberNotFound)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown error category: {s}"))
    }
}

#[cfg(test)]
#[path = "category_tests.rs"]
mod tests;
