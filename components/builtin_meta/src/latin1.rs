//! Byte strings carried in Unicode documents
//!
//! Metadata documents are Unicode text, but built-in strings are arbitrary
//! byte sequences (internal keys start with 0xFF, which is never valid
//! UTF-8). Code points U+0000..U+00FF are identified with bytes.

use crate::error::{MetadataError, Result};

/// Convert a document string into bytes
pub fn to_bytes(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| MetadataError::InvalidCodePoint {
                codepoint: u32::from(c),
                context: text.to_string(),
            })
        })
        .collect()
}

/// Convert bytes back into a document string
pub fn to_text(bytes: &[u8]) -> String {
    bytes.iter().map(|b| char::from(*b)).collect()
}

/// Serde helper writing byte strings in their document form
pub mod text {
    use serde::Serializer;

    /// Serialize bytes as a U+0000..U+00FF string
    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_text(bytes))
    }
}
