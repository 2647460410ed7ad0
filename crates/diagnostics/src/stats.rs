// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frequency statistics over classified diagnostics.

use crate::classify::classify;
use crate::extract::normalize;
use nb_core::ErrorCategory;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: ErrorCategory,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCount {
    pub message: String,
    pub category: ErrorCategory,
    pub count: usize,
}

/// Counts for one build, ranked by count descending.
///
/// Category ties keep taxonomy order; message ties sort by message text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticStats {
    pub total: usize,
    pub by_category: Vec<CategoryCount>,
    pub by_message: Vec<MessageCount>,
}

impl DiagnosticStats {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut categories: BTreeMap<ErrorCategory, usize> = BTreeMap::new();
        let mut messages: HashMap<String, (ErrorCategory, usize)> = HashMap::new();
        let mut total = 0;
        for line in lines {
            let message = normalize(line.as_ref());
            let category = classify(&message);
            *categories.entry(category).or_insert(0) += 1;
            messages.entry(message).or_insert((category, 0)).1 += 1;
            total += 1;
        }

        let mut by_category: Vec<CategoryCount> =
            categories.into_iter().map(|(category, count)| CategoryCount { category, count }).collect();
        by_category.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));

        let mut by_message: Vec<MessageCount> = messages
            .into_iter()
            .map(|(message, (category, count))| MessageCount { message, category, count })
            .collect();
        by_message.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.message.cmp(&b.message)));

        Self { total, by_category, by_message }
    }

    pub fn count(&self, category: ErrorCategory) -> usize {
        self.by_category.iter().find(|c| c.category == category).map(|c| c.count).unwrap_or(0)
    }

    /// The highest ranked category, if any diagnostics were counted.
    pub fn top_category(&self) -> Option<ErrorCategory> {
        self.by_category.first().map(|c| c.category)
    }
}

/// Longitudinal counts across the attempts of an auto-fix chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStats {
    /// One entry per attempt, in chain order.
    pub attempts: Vec<DiagnosticStats>,
    pub combined: DiagnosticStats,
}

impl ChainStats {
    pub fn from_attempts<A, I, S>(attempts: A) -> Self
    where
        A: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut all = Vec::new();
        let mut per_attempt = Vec::new();
        for lines in attempts {
            let lines: Vec<String> = lines.into_iter().map(|l| l.as_ref().to_string()).collect();
            per_attempt.push(DiagnosticStats::from_lines(&lines));
            all.extend(lines);
        }
        Self { attempts: per_attempt, combined: DiagnosticStats::from_lines(&all) }
    }

    /// Categories present in the first attempt and absent from the last.
    pub fn resolved_categories(&self) -> Vec<ErrorCategory> {
        let (Some(first), Some(last)) = (self.attempts.first(), self.attempts.last()) else {
            return Vec::new();
        };
        first
            .by_category
            .iter()
            .map(|c| c.category)
            .filter(|category| last.count(*category) == 0)
            .collect()
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
