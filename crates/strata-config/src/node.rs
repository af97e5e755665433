//! Configuration tree nodes.
//!
//! A [`Node`] is one of: a mapping, a sequence, or a scalar. Scalars include
//! [`OpaqueRef`], a handle to something only the downstream bundler knows how
//! to execute (a plugin instance, a function). Opaque references are compared
//! by identity and never merged structurally.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Number, Value};

use crate::error::{ConfigError, Result};
use crate::fragment::OPAQUE_KEY;

/// Insertion-ordered mapping of keys to nodes.
pub type Mapping = IndexMap<String, Node>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    Opaque(OpaqueRef),
}

/// The kind of a node, without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
    Opaque,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "boolean",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Sequence => "sequence",
            NodeKind::Mapping => "mapping",
            NodeKind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    /// An empty mapping.
    pub fn empty_mapping() -> Self {
        Node::Mapping(Mapping::new())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Opaque(_) => NodeKind::Opaque,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueRef> {
        match self {
            Node::Opaque(opaque) => Some(opaque),
            _ => None,
        }
    }

    /// Look up a dotted path such as `output.filename` or `entry.0`.
    ///
    /// Mapping segments match keys; numeric segments index into sequences.
    /// An empty path returns the node itself.
    pub fn get(&self, path: &str) -> Option<&Node> {
        if path.is_empty() {
            return Some(self);
        }

        path.split('.').try_fold(self, |node, segment| match node {
            Node::Mapping(map) => map.get(segment),
            Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Convert to JSON. Opaque references become `{"$opaque": kind, "options": ...}`.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::Sequence(items) => Value::Array(items.iter().map(Node::to_value).collect()),
            Node::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_value()))
                    .collect(),
            ),
            Node::Opaque(opaque) => opaque.to_value(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::UnsupportedFormat(format!("json: {e}")))
    }

    /// Render as a TOML document.
    ///
    /// Fails when the node is not a mapping or contains nulls, which TOML
    /// cannot encode.
    pub fn to_toml_string(&self) -> Result<String> {
        if !matches!(self, Node::Mapping(_)) {
            return Err(ConfigError::UnsupportedFormat(format!(
                "toml: a document must be a mapping, found {}",
                self.kind()
            )));
        }
        toml::to_string_pretty(self).map_err(|e| ConfigError::UnsupportedFormat(format!("toml: {e}")))
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(map) => serializer.collect_map(map),
            Node::Opaque(opaque) => opaque.serialize(serializer),
        }
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Number(value.into())
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Node::Number(value.into())
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl From<OpaqueRef> for Node {
    fn from(opaque: OpaqueRef) -> Self {
        Node::Opaque(opaque)
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Node::Mapping(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Handle to an externally executed value, such as a plugin instance.
///
/// Clones share identity. Two handles built separately are never equal, even
/// when their kind and options match.
#[derive(Clone)]
pub struct OpaqueRef(Arc<OpaqueInner>);

struct OpaqueInner {
    kind: String,
    options: Value,
}

impl OpaqueRef {
    pub fn new(kind: impl Into<String>, options: Value) -> Self {
        Self(Arc::new(OpaqueInner {
            kind: kind.into(),
            options,
        }))
    }

    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    pub fn options(&self) -> &Value {
        &self.0.options
    }

    pub fn same_instance(&self, other: &OpaqueRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn to_value(&self) -> Value {
        let mut object = serde_json::Map::with_capacity(2);
        object.insert(OPAQUE_KEY.to_string(), Value::String(self.0.kind.clone()));
        if !self.0.options.is_null() {
            object.insert("options".to_string(), self.0.options.clone());
        }
        Value::Object(object)
    }
}

impl PartialEq for OpaqueRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl Eq for OpaqueRef {}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueRef")
            .field("kind", &self.0.kind)
            .field("options", &self.0.options)
            .finish()
    }
}

impl Serialize for OpaqueRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let has_options = !self.0.options.is_null();
        let mut map = serializer.serialize_map(Some(if has_options { 2 } else { 1 }))?;
        map.serialize_entry(OPAQUE_KEY, &self.0.kind)?;
        if has_options {
            map.serialize_entry("options", &self.0.options)?;
        }
        map.end()
    }
}
