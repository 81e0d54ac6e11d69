//! Built-in object and string metadata
//!
//! Loads base metadata documents plus user overrides, merges and normalizes
//! them through a fixed sequence of passes, and produces an immutable
//! [`FinalizedGraph`] that the RAM and ROM encoders consume.
//!
//! # Overview
//!
//! - [`document`]: serde types for the on-disk YAML/JSON documents
//! - [`model`]: normalized string/object/property entries
//! - [`magic`]: resolution of native function magic values
//! - [`layout`]: stridx ordering of index-bearing strings
//! - [`loader`]: the pass pipeline, driven by [`MetadataLoader`]
//!
//! # Example
//!
//! ```no_run
//! use builtin_meta::{BaseDocument, MetadataLoader, Target, UsedStridxDocument};
//!
//! let strings = BaseDocument::from_yaml_str("strings.yaml", "strings: []").unwrap();
//! let objects = BaseDocument::from_yaml_str("objects.yaml", "objects: []").unwrap();
//! let graph = MetadataLoader::new(vec![strings, objects])
//!     .with_used_stridx(UsedStridxDocument::default())
//!     .with_build_version(20000)
//!     .load(Target::Ram)
//!     .unwrap();
//! println!("{} objects", graph.objects().len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod graph;
pub mod latin1;
pub mod layout;
pub mod loader;
pub mod magic;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod shorthand;
pub mod strings;

pub use document::{BaseDocument, OverrideDocument, UsedStridxDocument};
pub use error::{MetadataError, Result};
pub use graph::{FinalizedGraph, ReservedRange};
pub use loader::MetadataLoader;
pub use magic::{resolve_magic, MagicError, MagicSpec};
pub use model::{
    Attributes, DoubleBits, ObjectClass, ObjectEntry, PropertyEntry, PropertyValue, StringEntry,
    Target,
};
