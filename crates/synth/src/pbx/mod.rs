// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory object graph of an Xcode project descriptor (`project.pbxproj`).
//!
//! The graph is built first, validated, and only then written out in one
//! pass by [`serialize`]. [`read`] parses descriptor text back into the same
//! graph so the checks can run on either side of serialization.

mod parse;
mod write;

pub use parse::{parse, read, Node};
pub use write::serialize;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use thiserror::Error;

/// Object identifier: 24 uppercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub const LEN: usize = 24;

    /// Accept `s` only if it has the identifier shape.
    pub fn parse(s: &str) -> Option<Self> {
        is_object_id(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_object_id(s: &str) -> bool {
    s.len() == ObjectId::LEN && s.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

/// Deterministic identifier source.
///
/// Each id hashes the project seed with the object kind and a key naming the
/// object, so the same inputs always produce the same descriptor. A collision
/// with an already issued id is re-hashed with a salt.
pub struct IdGen {
    seed: String,
    issued: HashSet<ObjectId>,
}

impl IdGen {
    pub fn new(seed: impl Into<String>) -> Self {
        Self { seed: seed.into(), issued: HashSet::new() }
    }

    pub fn next(&mut self, kind: &str, key: &str) -> ObjectId {
        let mut salt: u32 = 0;
        loop {
            let mut hasher = Sha256::new();
            hasher.update(self.seed.as_bytes());
            hasher.update([0]);
            hasher.update(kind.as_bytes());
            hasher.update([0]);
            hasher.update(key.as_bytes());
            if salt > 0 {
                hasher.update(salt.to_be_bytes());
            }
            let digest = hasher.finalize();
            let hex: String = digest.iter().take(ObjectId::LEN / 2).map(|b| format!("{b:02X}")).collect();
            let id = ObjectId(hex);
            if self.issued.insert(id.clone()) {
                return id;
            }
            salt += 1;
        }
    }
}

/// A property value inside an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Ref(ObjectId),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<K: Into<String>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ref_id(&self) -> Option<&ObjectId> {
        match self {
            Value::Ref(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            _ => &[],
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a ObjectId>) {
        match self {
            Value::Str(_) => {}
            Value::Ref(id) => out.push(id),
            Value::List(items) => items.iter().for_each(|v| v.collect_refs(out)),
            Value::Map(entries) => entries.iter().for_each(|(_, v)| v.collect_refs(out)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Ref(id)
    }
}

impl From<&ObjectId> for Value {
    fn from(id: &ObjectId) -> Self {
        Value::Ref(id.clone())
    }
}

/// One object in the `objects` dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbxObject {
    pub isa: String,
    /// Written after every reference to this object; not part of the data.
    pub comment: Option<String>,
    pub fields: Vec<(String, Value)>,
}

impl PbxObject {
    pub fn new(isa: impl Into<String>) -> Self {
        Self { isa: isa.into(), comment: None, fields: Vec::new() }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_ref(&self, key: &str) -> Option<&ObjectId> {
        self.get(key).and_then(Value::as_ref_id)
    }

    pub fn get_list(&self, key: &str) -> &[Value] {
        self.get(key).map(Value::as_list).unwrap_or(&[])
    }

    pub fn refs(&self) -> Vec<&ObjectId> {
        let mut out = Vec::new();
        for (_, value) in &self.fields {
            value.collect_refs(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PbxError {
    #[error("dangling object reference {0}")]
    Dangling(ObjectId),

    #[error("descriptor references {0}, which is not part of the package")]
    UnknownPath(String),

    #[error("file reference {0} is not reachable from the main group")]
    Unreachable(ObjectId),

    #[error("descriptor has no {0}")]
    Missing(&'static str),

    #[error("descriptor parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
}

/// Source trees whose file references are resolved through the group tree.
const GROUP_TREE: &str = "<group>";
const SOURCE_ROOT: &str = "SOURCE_ROOT";

/// The full object graph plus its root project object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbxGraph {
    pub object_version: String,
    pub root: ObjectId,
    pub objects: BTreeMap<ObjectId, PbxObject>,
}

impl PbxGraph {
    pub fn new(root: ObjectId) -> Self {
        Self { object_version: "56".to_string(), root, objects: BTreeMap::new() }
    }

    pub fn insert(&mut self, id: ObjectId, object: PbxObject) {
        self.objects.insert(id, object);
    }

    pub fn get(&self, id: &ObjectId) -> Option<&PbxObject> {
        self.objects.get(id)
    }

    pub fn count(&self, isa: &str) -> usize {
        self.objects.values().filter(|o| o.isa == isa).count()
    }

    /// Referenced identifiers with no object, sorted and deduplicated.
    pub fn dangling(&self) -> Vec<ObjectId> {
        let mut missing = BTreeSet::new();
        if !self.objects.contains_key(&self.root) {
            missing.insert(self.root.clone());
        }
        for object in self.objects.values() {
            for id in object.refs() {
                if !self.objects.contains_key(id) {
                    missing.insert(id.clone());
                }
            }
        }
        missing.into_iter().collect()
    }

    /// Names of the native targets in project order.
    pub fn target_names(&self) -> Vec<String> {
        let Some(project) = self.get(&self.root) else {
            return Vec::new();
        };
        project
            .get_list("targets")
            .iter()
            .filter_map(Value::as_ref_id)
            .filter_map(|id| self.get(id))
            .filter_map(|target| target.get_str("name").map(str::to_string))
            .collect()
    }

    /// Resolve every source file reference to its path from the project root,
    /// returning `(path, file reference id)` in group order.
    ///
    /// Product references (built artifacts) are not included.
    pub fn file_paths(&self) -> Vec<(String, ObjectId)> {
        let mut out = Vec::new();
        let main_group = self.get(&self.root).and_then(|p| p.get_ref("mainGroup"));
        if let Some(main_group) = main_group {
            let mut visited = HashSet::new();
            self.walk_group(main_group, "", &mut visited, &mut out);
        }
        out
    }

    fn walk_group(
        &self,
        id: &ObjectId,
        prefix: &str,
        visited: &mut HashSet<ObjectId>,
        out: &mut Vec<(String, ObjectId)>,
    ) {
        if !visited.insert(id.clone()) {
            return;
        }
        let Some(object) = self.get(id) else {
            return;
        };
        let base = match object.get_str("sourceTree") {
            Some(SOURCE_ROOT) => "",
            _ => prefix,
        };
        let here = match object.get_str("path") {
            Some(path) if base.is_empty() => path.to_string(),
            Some(path) => format!("{base}/{path}"),
            None => base.to_string(),
        };
        match object.isa.as_str() {
            "PBXGroup" | "PBXVariantGroup" => {
                for child in object.get_list("children").iter().filter_map(Value::as_ref_id) {
                    self.walk_group(child, &here, visited, out);
                }
            }
            "PBXFileReference" => {
                let tree = object.get_str("sourceTree").unwrap_or(GROUP_TREE);
                if (tree == GROUP_TREE || tree == SOURCE_ROOT) && !here.is_empty() {
                    out.push((here, id.clone()));
                }
            }
            _ => {}
        }
    }

    /// Distinct values of a build setting across all configurations.
    pub fn setting_values(&self, key: &str) -> Vec<String> {
        let values: BTreeSet<String> = self
            .objects
            .values()
            .filter(|o| o.isa == "XCBuildConfiguration")
            .filter_map(|o| o.get("buildSettings"))
            .filter_map(|settings| settings.get(key))
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        values.into_iter().collect()
    }

    /// Structural checks run before the graph is serialized.
    ///
    /// - no reference points at a missing object
    /// - every source file reference is reachable from the main group
    /// - every resolved path, and every `INFOPLIST_FILE`, is in `included`
    pub fn validate(&self, included: &BTreeSet<String>) -> Result<(), PbxError> {
        if let Some(id) = self.dangling().into_iter().next() {
            return Err(PbxError::Dangling(id));
        }
        let project = self.get(&self.root).ok_or(PbxError::Missing("root project object"))?;
        if project.get_ref("mainGroup").is_none() {
            return Err(PbxError::Missing("main group"));
        }

        let resolved = self.file_paths();
        let reached: HashSet<&ObjectId> = resolved.iter().map(|(_, id)| id).collect();
        for (id, object) in &self.objects {
            let is_source = object.isa == "PBXFileReference"
                && object.get_str("sourceTree").unwrap_or(GROUP_TREE) == GROUP_TREE;
            if is_source && !reached.contains(id) {
                return Err(PbxError::Unreachable(id.clone()));
            }
        }
        for (path, _) in &resolved {
            if !included.contains(path) {
                return Err(PbxError::UnknownPath(path.clone()));
            }
        }
        for path in self.setting_values("INFOPLIST_FILE") {
            if !included.contains(&path) {
                return Err(PbxError::UnknownPath(path));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
