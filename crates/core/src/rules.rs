// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative `{patterns, effect}` rule tables.
//!
//! Each table is plain data; [`RuleTable`] is the one matcher that evaluates
//! them, whether the input is combined source text or a compiler diagnostic.

use regex::{Captures, Regex};

/// An ordered list of rules, each a set of patterns and the effect they trigger.
pub struct RuleTable<E> {
    rules: Vec<Rule<E>>,
}

struct Rule<E> {
    patterns: Vec<Regex>,
    effect: E,
}

/// One matching rule: its effect and the first of its patterns that hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a, E> {
    pub effect: &'a E,
    pub pattern: &'a str,
}

impl<E: Clone> RuleTable<E> {
    pub fn new(rules: &[(&[&str], E)]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|(patterns, effect)| {
                let patterns = patterns.iter().map(|p| Regex::new(p)).collect::<Result<_, _>>()?;
                Ok(Rule { patterns, effect: effect.clone() })
            })
            .collect::<Result<_, regex::Error>>()?;
        Ok(Self { rules })
    }
}

impl<E> RuleTable<E> {
    /// Every rule that matches, in table order.
    pub fn hits<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Hit<'a, E>> + 'a {
        self.rules.iter().filter_map(move |rule| {
            rule.patterns
                .iter()
                .find(|p| p.is_match(text))
                .map(|p| Hit { effect: &rule.effect, pattern: p.as_str() })
        })
    }

    /// The first rule in table order that matches.
    pub fn first<'a>(&'a self, text: &'a str) -> Option<Hit<'a, E>> {
        self.hits(text).next()
    }

    /// Capture groups of the first pattern that matches, for each matching
    /// rule in table order.
    pub fn captures<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (&'a E, Captures<'a>)> + 'a {
        self.rules
            .iter()
            .filter_map(move |rule| rule.patterns.iter().find_map(|p| p.captures(text)).map(|c| (&rule.effect, c)))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
