//! Error types for ROM initializer generation

use builtin_meta::MagicError;
use thiserror::Error;

/// ROM generation errors
#[derive(Debug, Error)]
pub enum RomError {
    /// A key or string value has no string record
    #[error("{context}: string {string:?} is not in the string table")]
    MissingString {
        /// Where the string is used
        context: String,
        /// String content
        string: String,
    },

    /// Reference to an object that does not exist
    #[error("object {from} references unknown object {target}")]
    UnknownObject {
        /// Referencing object
        from: String,
        /// Referenced id
        target: String,
    },

    /// Property attributes without a ROM flag encoding
    #[error("object {id}, property {key}: attributes {attributes:?} not allowed in ROM")]
    UnsupportedAttributes {
        /// Object id
        id: String,
        /// Property key
        key: String,
        /// Attributes present
        attributes: String,
    },

    /// Callable object lacks data the initializer needs
    #[error("malformed function {id}: {reason}")]
    MalformedFunction {
        /// Object id
        id: String,
        /// What is wrong
        reason: String,
    },

    /// More pointers than the compressed range holds
    #[error("{count} compressed ROM pointers do not fit below 0x10000")]
    PointerSpaceExhausted {
        /// Pointers requested
        count: usize,
    },

    /// Magic resolution failed
    #[error("magic error: {0}")]
    Magic(#[from] MagicError),
}

/// Result type for ROM generation
pub type Result<T> = std::result::Result<T, RomError>;
