// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn new_ids_carry_prefix_and_are_unique() {
    let a = TestId::new();
    let b = TestId::new();
    assert!(a.as_str().starts_with("tst-"));
    assert_eq!(a.as_str().len(), 4 + 19);
    assert_ne!(a, b);
}

#[test]
fn suffix_strips_prefix() {
    let id = TestId::from_string("tst-abcdef");
    assert_eq!(id.suffix(), "abcdef");
    assert_eq!(id.short(3), "abc");
}

#[test]
fn suffix_of_foreign_id_is_whole_string() {
    let id = TestId::from_string("other");
    assert_eq!(id.suffix(), "other");
}

#[test]
fn hash_map_lookup_by_str() {
    let mut map = HashMap::new();
    map.insert(TestId::from_string("tst-k"), 42);
    assert_eq!(map.get("tst-k"), Some(&42));
}

#[test]
fn serde_is_transparent() {
    let id = TestId::from_string("tst-1");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"tst-1\"");
    let parsed: TestId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[yare::parameterized(
    shorter = { "abc", 8, "abc" },
    exact   = { "abcdefgh", 8, "abcdefgh" },
    longer  = { "abcdefghijk", 8, "abcdefgh" },
    empty   = { "", 4, "" },
    utf8    = { "héllo", 2, "hé" },
)]
fn short_truncates_on_char_boundaries(input: &str, n: usize, expected: &str) {
    assert_eq!(short(input, n), expected);
}
