//! Kind-only summaries of configuration trees.
//!
//! Two trees have the same shape when every mapping has the same keys and
//! every path holds the same kind of node. Scalar values and sequence
//! contents are ignored.

use std::collections::BTreeMap;
use std::fmt;

use crate::node::{Node, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf(NodeKind),
    Sequence,
    Mapping(BTreeMap<String, Shape>),
}

/// First place where two shapes disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDifference {
    /// Dotted path of the disagreement, empty for the root.
    pub path: String,
    pub left: String,
    pub right: String,
}

impl Shape {
    pub fn of(node: &Node) -> Self {
        match node {
            Node::Mapping(map) => Shape::Mapping(
                map.iter()
                    .map(|(key, value)| (key.clone(), Shape::of(value)))
                    .collect(),
            ),
            Node::Sequence(_) => Shape::Sequence,
            other => Shape::Leaf(other.kind()),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Shape::Leaf(kind) => kind.as_str(),
            Shape::Sequence => "sequence",
            Shape::Mapping(_) => "mapping",
        }
    }

    /// Find the first difference, visiting keys in sorted order.
    pub fn first_difference(&self, other: &Shape) -> Option<ShapeDifference> {
        let mut path = Vec::new();
        difference_at(self, other, &mut path)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

fn difference_at<'a>(
    left: &'a Shape,
    right: &'a Shape,
    path: &mut Vec<&'a str>,
) -> Option<ShapeDifference> {
    match (left, right) {
        (Shape::Mapping(left_map), Shape::Mapping(right_map)) => {
            let keys: std::collections::BTreeSet<&String> =
                left_map.keys().chain(right_map.keys()).collect();
            for key in keys {
                path.push(key);
                let found = match (left_map.get(key), right_map.get(key)) {
                    (Some(l), Some(r)) => difference_at(l, r, path),
                    (l, r) => Some(ShapeDifference {
                        path: path.join("."),
                        left: l.map_or("missing", Shape::describe).to_string(),
                        right: r.map_or("missing", Shape::describe).to_string(),
                    }),
                };
                path.pop();
                if found.is_some() {
                    return found;
                }
            }
            None
        }
        (l, r) if l == r => None,
        (l, r) => Some(ShapeDifference {
            path: path.join("."),
            left: l.describe().to_string(),
            right: r.describe().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;
    use serde_json::{Value, json};

    fn shape(value: Value) -> Shape {
        Shape::of(Fragment::from_value(value).unwrap().root())
    }

    #[test]
    fn values_and_sequence_lengths_do_not_matter() {
        let dev = shape(json!({"entry": ["a", "b"], "output": {"filename": "[name].js"}}));
        let prod = shape(json!({"entry": ["a"], "output": {"filename": "[name]-[hash].js"}}));
        assert_eq!(dev.first_difference(&prod), None);
    }

    #[test]
    fn key_order_does_not_matter() {
        assert_eq!(shape(json!({"a": 1, "b": 2})), shape(json!({"b": 3, "a": 4})));
    }

    #[test]
    fn reports_missing_keys() {
        let dev = shape(json!({"devServer": {"hot": true, "port": 5001}}));
        let prod = shape(json!({"devServer": {"port": 5001}}));
        assert_eq!(
            dev.first_difference(&prod),
            Some(ShapeDifference {
                path: "devServer.hot".to_string(),
                left: "boolean".to_string(),
                right: "missing".to_string(),
            })
        );
    }

    #[test]
    fn reports_kind_changes() {
        let dev = shape(json!({"entry": ["a", "b"]}));
        let prod = shape(json!({"entry": "a"}));
        let diff = dev.first_difference(&prod).unwrap();
        assert_eq!(diff.path, "entry");
        assert_eq!(diff.left, "sequence");
        assert_eq!(diff.right, "string");
    }

    #[test]
    fn root_kind_change_has_empty_path() {
        let diff = shape(json!({})).first_difference(&shape(json!([]))).unwrap();
        assert_eq!(diff.path, "");
    }
}
