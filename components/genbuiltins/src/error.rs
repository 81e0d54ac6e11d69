//! Error types for the generator binary

use builtin_meta::MetadataError;
use ram_encoder::EncodeError;
use rom_generator::RomError;
use std::path::PathBuf;
use thiserror::Error;

/// Generator errors
#[derive(Debug, Error)]
pub enum GenError {
    /// Reading an input or writing an output failed
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON input could not be parsed, or output could not be rendered
    #[error("JSON error in {document}: {source}")]
    Json {
        /// Document name
        document: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Metadata load failed
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// RAM encoding failed
    #[error("RAM init data: {0}")]
    Encode(#[from] EncodeError),

    /// ROM generation failed
    #[error("ROM initializers: {0}")]
    Rom(#[from] RomError),
}

/// Result type for generator operations
pub type GenResult<T> = Result<T, GenError>;
