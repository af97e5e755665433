//! Deep merge of configuration trees.
//!
//! Rules, applied depth-first:
//!
//! - mapping onto mapping: key by key; keys on one side only pass through,
//!   keys on both sides recurse. Base key order is kept and overlay-only keys
//!   follow in overlay order.
//! - sequence onto sequence: combined by the [`SequenceStrategy`] registered
//!   for the sequence's path, [`SequenceStrategy::Append`] by default.
//! - anything else (scalars, opaque references, null, differing kinds): the
//!   overlay value replaces the base value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node::{Mapping, Node};

/// How two sequences at the same path are combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStrategy {
    /// Base entries, then overlay entries.
    #[default]
    Append,
    /// Overlay entries, then base entries.
    Prepend,
    /// Overlay entries only.
    Replace,
    /// Overlay mappings whose value under the named key equals that of a
    /// base mapping entry are merged into it; everything else is appended.
    MatchBy(String),
}

/// Per-path sequence strategies.
///
/// Paths are dotted mapping keys from the root (`module.rules`). Sequence
/// positions do not add segments, so the loaders inside every rule of
/// `module.rules` share the path `module.rules.use`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePolicy {
    #[serde(default)]
    pub sequences: BTreeMap<String, SequenceStrategy>,
}

static APPEND: SequenceStrategy = SequenceStrategy::Append;

impl MergePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sequence(mut self, path: impl Into<String>, strategy: SequenceStrategy) -> Self {
        self.sequences.insert(path.into(), strategy);
        self
    }

    pub fn strategy_for(&self, path: &str) -> &SequenceStrategy {
        self.sequences.get(path).unwrap_or(&APPEND)
    }
}

/// Merge `overlay` onto `base`, producing a new tree. Neither input is modified.
pub fn merge_nodes(base: &Node, overlay: &Node, policy: &MergePolicy) -> Node {
    let mut path = Vec::new();
    merge_at(base, overlay, policy, &mut path)
}

fn merge_at(base: &Node, overlay: &Node, policy: &MergePolicy, path: &mut Vec<String>) -> Node {
    match (base, overlay) {
        (Node::Mapping(base), Node::Mapping(overlay)) => {
            Node::Mapping(merge_mappings(base, overlay, policy, path))
        }
        (Node::Sequence(base), Node::Sequence(overlay)) => {
            Node::Sequence(merge_sequences(base, overlay, policy, path))
        }
        (_, overlay) => overlay.clone(),
    }
}

fn merge_mappings(
    base: &Mapping,
    overlay: &Mapping,
    policy: &MergePolicy,
    path: &mut Vec<String>,
) -> Mapping {
    let mut merged = Mapping::with_capacity(base.len() + overlay.len());

    for (key, base_value) in base {
        let value = match overlay.get(key) {
            Some(overlay_value) => {
                path.push(key.clone());
                let value = merge_at(base_value, overlay_value, policy, path);
                path.pop();
                value
            }
            None => base_value.clone(),
        };
        merged.insert(key.clone(), value);
    }

    for (key, overlay_value) in overlay {
        if !base.contains_key(key) {
            merged.insert(key.clone(), overlay_value.clone());
        }
    }

    merged
}

fn merge_sequences(
    base: &[Node],
    overlay: &[Node],
    policy: &MergePolicy,
    path: &mut Vec<String>,
) -> Vec<Node> {
    match policy.strategy_for(&path.join(".")) {
        SequenceStrategy::Append => base.iter().chain(overlay).cloned().collect(),
        SequenceStrategy::Prepend => overlay.iter().chain(base).cloned().collect(),
        SequenceStrategy::Replace => overlay.to_vec(),
        SequenceStrategy::MatchBy(key) => match_by(base, overlay, key, policy, path),
    }
}

fn match_by(
    base: &[Node],
    overlay: &[Node],
    key: &str,
    policy: &MergePolicy,
    path: &mut Vec<String>,
) -> Vec<Node> {
    let mut merged = base.to_vec();

    for item in overlay {
        let slot = match_key(item, key).and_then(|wanted| {
            merged[..base.len()]
                .iter()
                .position(|existing| match_key(existing, key) == Some(wanted))
        });

        match slot {
            Some(index) => {
                let combined = merge_at(&merged[index], item, policy, path);
                merged[index] = combined;
            }
            None => merged.push(item.clone()),
        }
    }

    merged
}

fn match_key<'a>(item: &'a Node, key: &str) -> Option<&'a Node> {
    item.as_mapping().and_then(|map| map.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::OpaqueRef;
    use serde_json::{Value, json};

    fn node(value: Value) -> Node {
        crate::fragment::Fragment::from_value(value)
            .unwrap()
            .into_node()
    }

    fn merged(base: Value, overlay: Value, policy: &MergePolicy) -> Value {
        merge_nodes(&node(base), &node(overlay), policy).to_value()
    }

    #[test]
    fn scalar_override() {
        let result = merged(json!({"a": 1}), json!({"a": 2}), &MergePolicy::default());
        assert_eq!(result, json!({"a": 2}));
    }

    #[test]
    fn sequences_concatenate_by_default() {
        let result = merged(
            json!({"entry": ["x"]}),
            json!({"entry": ["y", "z"]}),
            &MergePolicy::default(),
        );
        assert_eq!(result, json!({"entry": ["x", "y", "z"]}));
    }

    #[test]
    fn disjoint_keys_union() {
        let result = merged(json!({"a": 1}), json!({"b": 2}), &MergePolicy::default());
        assert_eq!(result, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn overlay_keys_follow_base_keys() {
        let result = merge_nodes(
            &node(json!({"b": 1, "a": 1})),
            &node(json!({"c": 2, "a": 2})),
            &MergePolicy::default(),
        );
        let keys: Vec<_> = result.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn kind_mismatch_replaces() {
        let result = merged(
            json!({"entry": ["a", "b"], "devServer": {"port": 5001}}),
            json!({"entry": "a", "devServer": false}),
            &MergePolicy::default(),
        );
        assert_eq!(result, json!({"entry": "a", "devServer": false}));
    }

    #[test]
    fn null_overlay_replaces() {
        let result = merged(
            json!({"devServer": {"port": 5001}}),
            json!({"devServer": null}),
            &MergePolicy::default(),
        );
        assert_eq!(result, json!({"devServer": null}));
    }

    #[test]
    fn nested_mappings_recurse() {
        let result = merged(
            json!({"output": {"path": "dist", "filename": "[name].js"}}),
            json!({"output": {"filename": "[name]-[hash].js"}}),
            &MergePolicy::default(),
        );
        assert_eq!(
            result,
            json!({"output": {"path": "dist", "filename": "[name]-[hash].js"}})
        );
    }

    #[test]
    fn prepend_and_replace_strategies() {
        let policy = MergePolicy::new()
            .with_sequence("entry", SequenceStrategy::Prepend)
            .with_sequence("resolve.extensions", SequenceStrategy::Replace);
        let result = merged(
            json!({"entry": ["init.js"], "resolve": {"extensions": [".js", ".elm"]}}),
            json!({"entry": ["client.js"], "resolve": {"extensions": [".ts"]}}),
            &policy,
        );
        assert_eq!(
            result,
            json!({"entry": ["client.js", "init.js"], "resolve": {"extensions": [".ts"]}})
        );
    }

    #[test]
    fn match_by_merges_rules_sharing_a_key() {
        let policy = MergePolicy::new()
            .with_sequence("module.rules", SequenceStrategy::MatchBy("test".into()))
            .with_sequence("module.rules.use", SequenceStrategy::Prepend);
        let result = merged(
            json!({"module": {"rules": [
                {"test": "\\.woff$", "use": ["file-loader"]},
                {"test": "\\.elm$", "exclude": ["elm-stuff"], "use": ["elm-webpack-loader"]}
            ]}}),
            json!({"module": {"rules": [
                {"test": "\\.elm$", "use": ["elm-hot-loader"]},
                {"test": "\\.scss$", "use": ["sass-loader"]}
            ]}}),
            &policy,
        );
        assert_eq!(
            result,
            json!({"module": {"rules": [
                {"test": "\\.woff$", "use": ["file-loader"]},
                {"test": "\\.elm$", "exclude": ["elm-stuff"], "use": ["elm-hot-loader", "elm-webpack-loader"]},
                {"test": "\\.scss$", "use": ["sass-loader"]}
            ]}})
        );
    }

    #[test]
    fn match_by_only_matches_base_entries() {
        let policy = MergePolicy::new()
            .with_sequence("rules", SequenceStrategy::MatchBy("test".into()));
        let result = merged(
            json!({"rules": [{"test": "a", "use": ["x"]}]}),
            json!({"rules": [
                {"test": "b", "use": ["y"]},
                {"test": "b", "use": ["z"]}
            ]}),
            &policy,
        );
        assert_eq!(
            result,
            json!({"rules": [
                {"test": "a", "use": ["x"]},
                {"test": "b", "use": ["y"]},
                {"test": "b", "use": ["z"]}
            ]})
        );
    }

    #[test]
    fn match_by_appends_entries_without_the_key() {
        let policy =
            MergePolicy::new().with_sequence("rules", SequenceStrategy::MatchBy("test".into()));
        let result = merged(
            json!({"rules": [{"test": "a"}, "plain"]}),
            json!({"rules": [{"loader": "x"}, "plain"]}),
            &policy,
        );
        assert_eq!(
            result,
            json!({"rules": [{"test": "a"}, "plain", {"loader": "x"}, "plain"]})
        );
    }

    #[test]
    fn opaque_refs_are_replaced_not_merged() {
        let base_plugin = OpaqueRef::new("html", json!({"template": "a.html"}));
        let overlay_plugin = OpaqueRef::new("html", json!({"inject": "body"}));
        let base = Node::from_iter([("html", base_plugin)]);
        let overlay = Node::from_iter([("html", overlay_plugin.clone())]);

        let result = merge_nodes(&base, &overlay, &MergePolicy::default());
        let merged_plugin = result.get("html").and_then(Node::as_opaque).unwrap();
        assert!(merged_plugin.same_instance(&overlay_plugin));
        assert_eq!(merged_plugin.options(), &json!({"inject": "body"}));
    }

    #[test]
    fn policy_deserializes_from_declaration_syntax() {
        let policy: MergePolicy = serde_json::from_value(json!({
            "sequences": {
                "entry": "prepend",
                "module.rules": { "match_by": "test" }
            }
        }))
        .unwrap();
        assert_eq!(policy.strategy_for("entry"), &SequenceStrategy::Prepend);
        assert_eq!(
            policy.strategy_for("module.rules"),
            &SequenceStrategy::MatchBy("test".to_string())
        );
        assert_eq!(policy.strategy_for("plugins"), &SequenceStrategy::Append);
    }
}
