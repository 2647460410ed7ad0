// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OpenStep-plist writer for [`PbxGraph`].
//!
//! Output layout follows Xcode's own: objects grouped into per-isa sections
//! sorted by isa, objects sorted by id, fields sorted with `isa` first.

use super::{ObjectId, PbxGraph, PbxObject, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Object kinds Xcode writes on a single line.
const INLINE_ISA: &[&str] = &["PBXBuildFile", "PBXFileReference"];

pub fn serialize(graph: &PbxGraph) -> String {
    let mut sections: BTreeMap<&str, Vec<(&ObjectId, &PbxObject)>> = BTreeMap::new();
    for (id, object) in &graph.objects {
        sections.entry(object.isa.as_str()).or_default().push((id, object));
    }

    let w = Writer { graph };
    let mut out = String::new();
    out.push_str("// !$*UTF8*$!\n{\n");
    out.push_str("\tarchiveVersion = 1;\n\tclasses = {\n\t};\n");
    let _ = writeln!(out, "\tobjectVersion = {};", quote(&graph.object_version));
    out.push_str("\tobjects = {\n");
    for (isa, objects) in sections {
        let _ = write!(out, "\n/* Begin {isa} section */\n");
        for (id, object) in objects {
            w.object(&mut out, id, object);
        }
        let _ = writeln!(out, "/* End {isa} section */");
    }
    out.push_str("\t};\n");
    let _ = writeln!(out, "\trootObject = {};", w.reference(&graph.root));
    out.push_str("}\n");
    out
}

struct Writer<'a> {
    graph: &'a PbxGraph,
}

impl Writer<'_> {
    fn object(&self, out: &mut String, id: &ObjectId, object: &PbxObject) {
        let inline = INLINE_ISA.contains(&object.isa.as_str());
        let _ = write!(out, "\t\t{} = {{", self.reference(id));
        if inline {
            let _ = write!(out, "isa = {}; ", quote(&object.isa));
        } else {
            let _ = write!(out, "\n\t\t\tisa = {};\n", quote(&object.isa));
        }
        for (key, value) in sorted(&object.fields) {
            if inline {
                let _ = write!(out, "{} = ", quote(key));
                self.value_inline(out, value);
                out.push_str("; ");
            } else {
                let _ = write!(out, "\t\t\t{} = ", quote(key));
                self.value(out, value, 3);
                out.push_str(";\n");
            }
        }
        if inline {
            out.push_str("};\n");
        } else {
            out.push_str("\t\t};\n");
        }
    }

    fn value(&self, out: &mut String, value: &Value, depth: usize) {
        match value {
            Value::Str(s) => out.push_str(&quote(s)),
            Value::Ref(id) => out.push_str(&self.reference(id)),
            Value::List(items) => {
                out.push_str("(\n");
                for item in items {
                    indent(out, depth + 1);
                    self.value(out, item, depth + 1);
                    out.push_str(",\n");
                }
                indent(out, depth);
                out.push(')');
            }
            Value::Map(entries) => {
                out.push_str("{\n");
                for (key, item) in sorted(entries) {
                    indent(out, depth + 1);
                    let _ = write!(out, "{} = ", quote(key));
                    self.value(out, item, depth + 1);
                    out.push_str(";\n");
                }
                indent(out, depth);
                out.push('}');
            }
        }
    }

    fn value_inline(&self, out: &mut String, value: &Value) {
        match value {
            Value::Str(s) => out.push_str(&quote(s)),
            Value::Ref(id) => out.push_str(&self.reference(id)),
            Value::List(items) => {
                out.push('(');
                for item in items {
                    self.value_inline(out, item);
                    out.push_str(", ");
                }
                out.push(')');
            }
            Value::Map(entries) => {
                out.push('{');
                for (key, item) in sorted(entries) {
                    let _ = write!(out, "{} = ", quote(key));
                    self.value_inline(out, item);
                    out.push_str("; ");
                }
                out.push('}');
            }
        }
    }

    /// `ID /* comment */`, or the bare id for uncommented objects.
    fn reference(&self, id: &ObjectId) -> String {
        match self.graph.get(id).and_then(|o| o.comment.as_deref()) {
            Some(comment) => format!("{id} /* {} */", comment.replace("*/", "* /")),
            None => id.to_string(),
        }
    }
}

fn sorted(entries: &[(String, Value)]) -> Vec<&(String, Value)> {
    let mut entries: Vec<_> = entries.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// Characters that may appear in an unquoted token.
fn is_bare(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.' | '-')
}

/// Quote a string unless it is a bare token.
pub(crate) fn quote(s: &str) -> Cow<'_, str> {
    let bare = !s.is_empty() && s.chars().all(is_bare) && !s.contains("//") && !s.contains("/*");
    if bare {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}
