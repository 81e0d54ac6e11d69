//! Error types for metadata loading and normalization

use crate::magic::MagicError;
use thiserror::Error;

/// Fatal metadata errors
///
/// Dangling references and orphan objects are not errors: they are healed
/// and logged by the normalization passes.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// YAML document could not be parsed
    #[error("failed to parse YAML document {document}: {source}")]
    Yaml {
        /// Document name (usually a path)
        document: String,
        /// Underlying parse error
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON document could not be parsed or written
    #[error("JSON error in {document}: {source}")]
    Json {
        /// Document name (usually a path)
        document: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Document string contains a code point above U+00FF
    #[error("invalid code point U+{codepoint:04X} in {context:?}, only U+0000..U+00FF map to bytes")]
    InvalidCodePoint {
        /// Offending code point
        codepoint: u32,
        /// The string it was found in
        context: String,
    },

    /// Override document uses a removed top level key
    #[error("override key '{0}' is no longer supported, use 'objects' with the matching action flag")]
    LegacyOverrideKey(&'static str),

    /// Two entries disagree on a value
    #[error("merge conflict for {what}: {detail}")]
    MergeConflict {
        /// The entry being merged
        what: String,
        /// Description of the conflicting values
        detail: String,
    },

    /// An override action targets an object that does not exist
    #[error("cannot {action} object {id} which doesn't exist")]
    MissingObject {
        /// Action name
        action: &'static str,
        /// Object id
        id: String,
    },

    /// An add action targets an object that already exists
    #[error("cannot add object {0} which already exists")]
    DuplicateObject(String),

    /// The `builtins` list names an unknown object
    #[error("builtins list references unknown object {0}")]
    UnknownBuiltin(String),

    /// Object lacks a required field or has inconsistent fields
    #[error("malformed object {id}: {reason}")]
    MalformedObject {
        /// Object id
        id: String,
        /// What is wrong
        reason: String,
    },

    /// Shorthand property value cannot be expanded
    #[error("malformed shorthand in object {id}, property {key}: {reason}")]
    MalformedShorthand {
        /// Object id
        id: String,
        /// Property key
        key: String,
        /// What is wrong
        reason: String,
    },

    /// Property value kind outside the supported set
    #[error("unsupported value shape in object {id}, property {key}: {kind}")]
    UnsupportedValueShape {
        /// Object id
        id: String,
        /// Property key
        key: String,
        /// The rejected kind
        kind: String,
    },

    /// Property attribute string contains unknown characters
    #[error("invalid attributes {attributes:?} in object {id}, property {key}")]
    InvalidAttributes {
        /// Object id
        id: String,
        /// Property key
        key: String,
        /// Attribute string as written
        attributes: String,
    },

    /// Unknown object class name
    #[error("unknown class {class:?} in object {id}")]
    UnknownClass {
        /// Object id
        id: String,
        /// Class name as written
        class: String,
    },

    /// A string define needed by the runtime is not provided
    #[error("source code needs define {0} not provided by strings")]
    MissingRequiredIndex(String),

    /// A bounded category or field overflows
    #[error("capacity overflow: {what} has {count} entries, limit is {limit}")]
    CapacityOverflow {
        /// What overflowed
        what: String,
        /// Actual count
        count: usize,
        /// Allowed maximum
        limit: usize,
    },

    /// Reserved words disagree with the canonical token order
    #[error("reserved word {word:?}: {reason}")]
    TokenOrder {
        /// The reserved word
        word: String,
        /// What is wrong
        reason: &'static str,
    },

    /// Define name pattern failed to compile
    #[error("failed to compile define name pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Magic value resolution failed
    #[error("magic error: {0}")]
    Magic(#[from] MagicError),
}

/// Result type for metadata operations
pub type Result<T> = std::result::Result<T, MetadataError>;
