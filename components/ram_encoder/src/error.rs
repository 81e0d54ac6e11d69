//! Error types for RAM init data encoding

use builtin_meta::MagicError;
use gen_support::BitstreamError;
use thiserror::Error;

/// RAM encoding errors
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A value does not fit its bit field
    #[error("{what} is {value}, field holds at most {limit}")]
    CapacityOverflow {
        /// Field description
        what: String,
        /// Offending value
        value: usize,
        /// Largest encodable value
        limit: usize,
    },

    /// Reference to an object outside the RAM top level list
    #[error("object {from} references {target} which is not a RAM top level object")]
    UnknownObject {
        /// Referencing object
        from: String,
        /// Referenced id
        target: String,
    },

    /// A specially encoded property has attributes the decoder cannot express
    #[error("object {id}, property {key}: attributes {found:?}, expected {expected:?}")]
    UnexpectedAttributes {
        /// Object id
        id: String,
        /// Property key
        key: String,
        /// Attributes present
        found: String,
        /// Attributes required
        expected: &'static str,
    },

    /// A specially encoded property has the wrong value kind
    #[error("object {id}, property {key}: unsupported value for this encoding ({reason})")]
    UnsupportedValueShape {
        /// Object id
        id: String,
        /// Property key
        key: String,
        /// What is wrong
        reason: &'static str,
    },

    /// Function object lacks data the decoder needs
    #[error("malformed function {id}: {reason}")]
    MalformedFunction {
        /// Object id
        id: String,
        /// What is wrong
        reason: String,
    },

    /// Literal string byte outside 7-bit range
    #[error("byte 0x{byte:02x} in {context:?} cannot be encoded in 7 bits")]
    NonAsciiLiteral {
        /// Offending byte
        byte: u8,
        /// The string it was found in
        context: String,
    },

    /// Magic resolution failed
    #[error("magic error: {0}")]
    Magic(#[from] MagicError),

    /// Bit stream write failed
    #[error("bit stream error: {0}")]
    Bitstream(#[from] BitstreamError),
}

/// Result type for RAM encoding
pub type Result<T> = std::result::Result<T, EncodeError>;
