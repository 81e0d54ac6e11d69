//! Build info record

use crate::error::{GenError, GenResult};
use serde::Deserialize;

/// Version and build identifier
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildInfo {
    /// Version as `major * 10000 + minor * 100 + patch`
    pub version: i64,
    /// Descriptive build identifier
    pub git_describe: String,
}

impl BuildInfo {
    /// Parse the JSON record
    pub fn from_json_str(name: &str, text: &str) -> GenResult<Self> {
        serde_json::from_str(text.trim()).map_err(|source| GenError::Json {
            document: name.to_string(),
            source,
        })
    }

    /// `major.minor.patch`
    pub fn version_string(&self) -> String {
        format!(
            "{}.{}.{}",
            self.version / 10000,
            (self.version / 100) % 100,
            self.version % 100
        )
    }
}
