// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reader for OpenStep-plist descriptor text.

use super::{ObjectId, PbxError, PbxGraph, PbxObject, Value};

/// Untyped plist node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Str(String),
    Array(Vec<Node>),
    Dict(Vec<(String, Node)>),
}

impl Node {
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Dict(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Parse descriptor text into an untyped tree.
pub fn parse(text: &str) -> Result<Node, PbxError> {
    let mut parser = Parser { src: text.as_bytes(), pos: 0 };
    let node = parser.node()?;
    parser.skip_trivia()?;
    if parser.pos != parser.src.len() {
        return Err(parser.error("trailing content after root object"));
    }
    Ok(node)
}

/// Parse descriptor text into a [`PbxGraph`].
///
/// String values with the identifier shape become references, so a
/// reference to an undeclared object shows up in [`PbxGraph::dangling`].
pub fn read(text: &str) -> Result<PbxGraph, PbxError> {
    let root = parse(text)?;
    let root_id = root
        .get("rootObject")
        .and_then(Node::as_str)
        .and_then(ObjectId::parse)
        .ok_or(PbxError::Missing("rootObject"))?;
    let mut graph = PbxGraph::new(root_id);
    if let Some(version) = root.get("objectVersion").and_then(Node::as_str) {
        graph.object_version = version.to_string();
    }

    let Some(Node::Dict(objects)) = root.get("objects") else {
        return Err(PbxError::Missing("objects dictionary"));
    };
    for (key, node) in objects {
        let id = ObjectId::parse(key)
            .ok_or_else(|| PbxError::Parse { offset: 0, message: format!("invalid object id {key:?}") })?;
        let Node::Dict(fields) = node else {
            return Err(PbxError::Parse { offset: 0, message: format!("object {key} is not a dictionary") });
        };
        let isa = node
            .get("isa")
            .and_then(Node::as_str)
            .ok_or_else(|| PbxError::Parse { offset: 0, message: format!("object {key} has no isa") })?;
        let mut object = PbxObject::new(isa);
        object.fields =
            fields.iter().filter(|(k, _)| k != "isa").map(|(k, v)| (k.clone(), to_value(v))).collect();
        graph.insert(id, object);
    }
    Ok(graph)
}

fn to_value(node: &Node) -> Value {
    match node {
        Node::Str(s) => match ObjectId::parse(s) {
            Some(id) => Value::Ref(id),
            None => Value::Str(s.clone()),
        },
        Node::Array(items) => Value::List(items.iter().map(to_value).collect()),
        Node::Dict(entries) => {
            Value::Map(entries.iter().map(|(k, v)| (k.clone(), to_value(v))).collect())
        }
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> PbxError {
        PbxError::Parse { offset: self.pos, message: message.into() }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    /// Skip whitespace plus `//` line and `/* */` block comments.
    fn skip_trivia(&mut self) -> Result<(), PbxError> {
        loop {
            match (self.peek(), self.src.get(self.pos + 1).copied()) {
                (Some(c), _) if c.is_ascii_whitespace() => self.pos += 1,
                (Some(b'/'), Some(b'/')) => {
                    while let Some(c) = self.peek() {
                        self.pos += 1;
                        if c == b'\n' {
                            break;
                        }
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            None => {
                                self.pos = start;
                                return Err(self.error("unterminated comment"));
                            }
                            Some(b'*') if self.src.get(self.pos + 1) == Some(&b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), PbxError> {
        self.skip_trivia()?;
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }

    fn node(&mut self) -> Result<Node, PbxError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b'{') => self.dict(),
            Some(b'(') => self.array(),
            Some(_) => self.string().map(Node::Str),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn dict(&mut self) -> Result<Node, PbxError> {
        self.expect(b'{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b'}') {
                self.pos += 1;
                return Ok(Node::Dict(entries));
            }
            let key = self.string()?;
            self.expect(b'=')?;
            let value = self.node()?;
            self.expect(b';')?;
            entries.push((key, value));
        }
    }

    fn array(&mut self) -> Result<Node, PbxError> {
        self.expect(b'(')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b')') {
                self.pos += 1;
                return Ok(Node::Array(items));
            }
            items.push(self.node()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {}
                _ => return Err(self.error("expected ',' or ')'")),
            }
        }
    }

    fn string(&mut self) -> Result<String, PbxError> {
        self.skip_trivia()?;
        if self.peek() == Some(b'"') {
            return self.quoted();
        }
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || b"_$/:.-+".contains(&c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected a string"));
        }
        Ok(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    fn quoted(&mut self) -> Result<String, PbxError> {
        let start = self.pos;
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None => {
                    self.pos = start;
                    return Err(self.error("unterminated string"));
                }
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(String::from_utf8_lossy(&bytes).into_owned());
                }
                Some(b'\\') => {
                    let escaped = self.src.get(self.pos + 1).copied();
                    bytes.push(match escaped {
                        Some(b'n') => b'\n',
                        Some(b't') => b'\t',
                        Some(c) => c,
                        None => return Err(self.error("dangling escape")),
                    });
                    self.pos += 2;
                }
                Some(c) => {
                    bytes.push(c);
                    self.pos += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
