//! Mode-aware build configuration composer.
//!
//! A declaration holds a shared base fragment and one overlay per [`Mode`].
//! Resolving merges the overlay onto the base with deterministic rules:
//! mappings merge recursively, sequences concatenate (or follow a per-path
//! [`SequenceStrategy`]), and everything else is replaced by the overlay.

pub mod compose;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fragment;
pub mod merge;
pub mod mode;
pub mod node;
pub mod shape;
pub mod validation;

// Re-export main types
pub use compose::{Composer, ResolvedConfig, resolve, resolve_values};
pub use config::{ConfigSet, ValidationRules};
pub use error::{ConfigError, Result};
pub use fragment::Fragment;
pub use merge::{MergePolicy, SequenceStrategy, merge_nodes};
pub use mode::{DEFAULT_MODE_ENV, DEFAULT_PRODUCTION_TRIGGER, Mode, ModeSignal, process_mode};
pub use node::{Mapping, Node, NodeKind, OpaqueRef};
pub use shape::{Shape, ShapeDifference};

// Re-export discovery and validation
pub use discovery::{ConfigDiscovery, discover};
pub use validation::{ConfigValidator, RequiredPathsValidator, ShapeValidator, validate};
