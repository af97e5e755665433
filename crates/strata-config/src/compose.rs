//! Resolution of a base fragment and an overlay into a final configuration.

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::fragment::Fragment;
use crate::merge::{MergePolicy, merge_nodes};
use crate::mode::Mode;
use crate::node::Node;
use crate::shape::Shape;

/// Merges overlays onto a base under a fixed [`MergePolicy`].
#[derive(Debug, Clone, Default)]
pub struct Composer {
    policy: MergePolicy,
}

impl Composer {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    /// Merge `overlay` onto `base`.
    ///
    /// Pure: both fragments are only borrowed, so a base can be resolved
    /// against any number of overlays.
    pub fn resolve(&self, base: &Fragment, overlay: &Fragment) -> ResolvedConfig {
        debug!(
            base_kind = %base.root().kind(),
            overlay_kind = %overlay.root().kind(),
            sequence_rules = self.policy.sequences.len(),
            "resolving configuration"
        );
        ResolvedConfig {
            root: merge_nodes(base.root(), overlay.root(), &self.policy),
            mode: None,
        }
    }
}

/// Resolve with the default policy (every sequence concatenates).
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use strata_config::{Fragment, resolve};
///
/// let base = Fragment::from_value(json!({ "entry": ["x"], "minify": false })).unwrap();
/// let overlay = Fragment::from_value(json!({ "entry": ["y", "z"], "minify": true })).unwrap();
///
/// let resolved = resolve(&base, &overlay);
/// assert_eq!(resolved.to_value(), json!({ "entry": ["x", "y", "z"], "minify": true }));
/// ```
pub fn resolve(base: &Fragment, overlay: &Fragment) -> ResolvedConfig {
    Composer::default().resolve(base, overlay)
}

/// Lower both values into fragments, then resolve.
///
/// Fails with [`crate::ConfigError::MalformedFragment`] when either value is
/// not a finite tree of supported nodes.
pub fn resolve_values(base: Value, overlay: Value) -> Result<ResolvedConfig> {
    let base = Fragment::from_value(base)?;
    let overlay = Fragment::from_value(overlay)?;
    Ok(resolve(&base, &overlay))
}

/// A fully merged configuration. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    root: Node,
    mode: Option<Mode>,
}

impl ResolvedConfig {
    pub(crate) fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The mode this configuration was resolved for, when it came from a
    /// [`crate::ConfigSet`].
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Look up a dotted path, see [`Node::get`].
    pub fn get(&self, path: &str) -> Option<&Node> {
        self.root.get(path)
    }

    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        self.root.to_json_pretty()
    }

    pub fn to_toml_string(&self) -> Result<String> {
        self.root.to_toml_string()
    }

    pub fn shape(&self) -> Shape {
        Shape::of(&self.root)
    }

    pub fn into_node(self) -> Node {
        self.root
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}
