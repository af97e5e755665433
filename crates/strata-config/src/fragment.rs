//! Configuration fragments and their construction from declarations.
//!
//! A [`Fragment`] is always a finite tree: every check that can fail happens
//! while lowering a declaration (JSON or TOML) into nodes. Two marker objects
//! are recognized during lowering:
//!
//! - `{"$ref": "#/json/pointer"}` is replaced by the node at that pointer in
//!   the same document. Reference chains that revisit a pointer are cycles.
//! - `{"$opaque": "<kind>", "options": ...}` becomes an [`OpaqueRef`]. Every
//!   use of the same declaration, including through `$ref`, shares identity.

use std::collections::HashMap;

use serde_json::{Number, Value};
use tracing::trace;

use crate::error::{ConfigError, Result};
use crate::node::{Mapping, Node, OpaqueRef};

pub const REF_KEY: &str = "$ref";
pub const OPAQUE_KEY: &str = "$opaque";

/// Maximum nesting depth of a lowered fragment.
pub const MAX_DEPTH: usize = 128;

/// Maximum number of nodes a single document may expand to.
pub const MAX_NODES: usize = 100_000;

/// A partial configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    root: Node,
}

impl Default for Fragment {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Node> for Fragment {
    fn from(root: Node) -> Self {
        Self { root }
    }
}

impl Fragment {
    /// An empty mapping; merging it onto anything is a no-op.
    pub fn empty() -> Self {
        Self {
            root: Node::empty_mapping(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_node(self) -> Node {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        match &self.root {
            Node::Mapping(map) => map.is_empty(),
            Node::Null => true,
            _ => false,
        }
    }

    /// Build a fragment from JSON. `$ref` pointers resolve against `value` itself.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use strata_config::Fragment;
    ///
    /// let fragment = Fragment::from_value(json!({
    ///     "paths": { "out": "dist" },
    ///     "output": { "path": { "$ref": "#/paths/out" } }
    /// }))
    /// .unwrap();
    /// assert_eq!(fragment.root().get("output.path").unwrap().as_str(), Some("dist"));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        Lowering::new(&value).fragment(&value, "")
    }

    /// Build a fragment from a TOML value.
    ///
    /// Datetimes and non-finite floats have no node counterpart and are rejected.
    pub fn from_toml(value: &toml::Value) -> Result<Self> {
        Self::from_value(toml_to_json(value, "")?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid("json", format!("Invalid JSON syntax: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml(&parse_toml(content)?)
    }
}

/// Parse a TOML document into a table value.
pub(crate) fn parse_toml(content: &str) -> Result<toml::Value> {
    let table: toml::Table = toml::from_str(content)
        .map_err(|e| ConfigError::invalid("toml", format!("Invalid TOML syntax: {e}")))?;
    Ok(toml::Value::Table(table))
}

/// Convert TOML to JSON, rejecting values the node model cannot hold.
pub(crate) fn toml_to_json(value: &toml::Value, pointer: &str) -> Result<Value> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::from(*i),
        toml::Value::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| {
                ConfigError::malformed(display_pointer(pointer), format!("non-finite number {f}"))
            })?,
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => {
            return Err(ConfigError::malformed(
                display_pointer(pointer),
                format!("datetime values are not supported (found {dt})"),
            ));
        }
        toml::Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| toml_to_json(item, &format!("{pointer}/{index}")))
                .collect::<Result<Vec<_>>>()?,
        ),
        toml::Value::Table(table) => {
            let mut object = serde_json::Map::with_capacity(table.len());
            for (key, item) in table {
                let child = toml_to_json(item, &child_pointer(pointer, key))?;
                object.insert(key.clone(), child);
            }
            Value::Object(object)
        }
    })
}

/// Lowers JSON values of one document into nodes.
///
/// One instance is shared by every fragment of a declaration so that opaque
/// declarations keep a single identity across base and overlays.
pub(crate) struct Lowering<'doc> {
    document: &'doc Value,
    expanding: Vec<String>,
    opaque: HashMap<String, OpaqueRef>,
    nodes: usize,
}

impl<'doc> Lowering<'doc> {
    pub(crate) fn new(document: &'doc Value) -> Self {
        Self {
            document,
            expanding: Vec::new(),
            opaque: HashMap::new(),
            nodes: 0,
        }
    }

    /// Lower `value`, found at `pointer` inside the document, into a fragment.
    pub(crate) fn fragment(&mut self, value: &Value, pointer: &str) -> Result<Fragment> {
        self.lower(value, pointer, 0).map(Fragment::from)
    }

    fn lower(&mut self, value: &Value, pointer: &str, depth: usize) -> Result<Node> {
        if depth > MAX_DEPTH {
            return Err(ConfigError::malformed(
                display_pointer(pointer),
                format!("nesting exceeds {MAX_DEPTH} levels"),
            ));
        }

        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(ConfigError::malformed(
                display_pointer(pointer),
                format!("document expands to more than {MAX_NODES} nodes"),
            ));
        }

        match value {
            Value::Null => Ok(Node::Null),
            Value::Bool(b) => Ok(Node::Bool(*b)),
            Value::Number(n) => Ok(Node::Number(n.clone())),
            Value::String(s) => Ok(Node::String(s.clone())),
            Value::Array(items) => {
                let mut lowered = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    lowered.push(self.lower(item, &format!("{pointer}/{index}"), depth + 1)?);
                }
                Ok(Node::Sequence(lowered))
            }
            Value::Object(object) => {
                if let Some(target) = object.get(REF_KEY) {
                    return self.expand_ref(object, target, pointer, depth);
                }
                if let Some(kind) = object.get(OPAQUE_KEY) {
                    return self.opaque(object, kind, pointer);
                }

                let mut mapping = Mapping::with_capacity(object.len());
                for (key, item) in object {
                    let node = self.lower(item, &child_pointer(pointer, key), depth + 1)?;
                    mapping.insert(key.clone(), node);
                }
                Ok(Node::Mapping(mapping))
            }
        }
    }

    fn expand_ref(
        &mut self,
        object: &serde_json::Map<String, Value>,
        target: &Value,
        pointer: &str,
        depth: usize,
    ) -> Result<Node> {
        if object.len() != 1 {
            return Err(ConfigError::malformed(
                display_pointer(pointer),
                format!("a {REF_KEY} object cannot carry other keys"),
            ));
        }

        let reference = target
            .as_str()
            .and_then(|s| s.strip_prefix('#'))
            .ok_or_else(|| {
                ConfigError::malformed(
                    display_pointer(pointer),
                    format!("{REF_KEY} must be a string of the form \"#/path/to/node\""),
                )
            })?;

        if self.expanding.iter().any(|open| open == reference) {
            let mut chain: Vec<String> = self
                .expanding
                .iter()
                .map(|open| display_pointer(open))
                .collect();
            chain.push(display_pointer(reference));
            return Err(ConfigError::malformed(
                display_pointer(pointer),
                format!("reference cycle: {}", chain.join(" -> ")),
            ));
        }

        let document = self.document;
        let resolved = document.pointer(reference).ok_or_else(|| {
            ConfigError::malformed(
                display_pointer(pointer),
                format!("unresolved reference {}", display_pointer(reference)),
            )
        })?;

        trace!(from = %display_pointer(pointer), to = %display_pointer(reference), "expanding reference");

        self.expanding.push(reference.to_string());
        let node = self.lower(resolved, reference, depth + 1);
        self.expanding.pop();
        node
    }

    fn opaque(
        &mut self,
        object: &serde_json::Map<String, Value>,
        kind: &Value,
        pointer: &str,
    ) -> Result<Node> {
        if let Some(extra) = object
            .keys()
            .find(|key| key.as_str() != OPAQUE_KEY && key.as_str() != "options")
        {
            return Err(ConfigError::malformed(
                display_pointer(pointer),
                format!("unexpected key '{extra}' in {OPAQUE_KEY} object (only \"options\" is allowed)"),
            ));
        }

        let kind = kind.as_str().ok_or_else(|| {
            ConfigError::malformed(
                display_pointer(pointer),
                format!("{OPAQUE_KEY} must name the kind as a string"),
            )
        })?;

        let opaque = self
            .opaque
            .entry(pointer.to_string())
            .or_insert_with(|| {
                let options = object.get("options").cloned().unwrap_or(Value::Null);
                OpaqueRef::new(kind, options)
            })
            .clone();
        Ok(Node::Opaque(opaque))
    }
}

fn child_pointer(pointer: &str, key: &str) -> String {
    format!("{pointer}/{}", key.replace('~', "~0").replace('/', "~1"))
}

pub(crate) fn display_pointer(pointer: &str) -> String {
    format!("#{pointer}")
}
