//! Input document loading

use crate::build_info::BuildInfo;
use crate::cli::Cli;
use crate::error::{GenError, GenResult};
use builtin_meta::{BaseDocument, OverrideDocument, UsedStridxDocument};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Everything read from disk before generation starts
#[derive(Debug, Clone)]
pub struct Inputs {
    /// Build info
    pub build_info: BuildInfo,
    /// Strings document followed by objects document
    pub bases: Vec<BaseDocument>,
    /// User override documents, in command line order
    pub overrides: Vec<OverrideDocument>,
    /// Used string defines
    pub used_stridx: UsedStridxDocument,
    /// NUL terminated InitJS bytes, empty when not given
    pub initjs: Vec<u8>,
}

impl Inputs {
    /// Read and parse every input named on the command line
    pub fn read(cli: &Cli) -> GenResult<Self> {
        let build_info = BuildInfo::from_json_str(
            &display_name(&cli.buildinfo),
            &read_text(&cli.buildinfo)?,
        )?;

        let mut bases = Vec::with_capacity(2);
        for path in [&cli.strings_metadata, &cli.objects_metadata] {
            bases.push(BaseDocument::from_yaml_str(
                &display_name(path),
                &read_text(path)?,
            )?);
        }

        let mut overrides = Vec::with_capacity(cli.user_builtin_metadata.len());
        for path in &cli.user_builtin_metadata {
            debug!("reading user builtin metadata from {}", path.display());
            overrides.push(OverrideDocument::from_yaml_str(
                &display_name(path),
                &read_text(path)?,
            )?);
        }

        let used_stridx = UsedStridxDocument::from_json_str(
            &display_name(&cli.used_stridx_metadata),
            &read_text(&cli.used_stridx_metadata)?,
        )?;

        let initjs = match &cli.initjs_data {
            Some(path) => terminate_initjs(read_bytes(path)?),
            None => Vec::new(),
        };

        Ok(Inputs {
            build_info,
            bases,
            overrides,
            used_stridx,
            initjs,
        })
    }
}

/// Append a NUL unless the data already ends in one
///
/// Data of length zero or one is left alone.
pub fn terminate_initjs(mut data: Vec<u8>) -> Vec<u8> {
    if data.len() > 1 && data.last() != Some(&0) {
        data.push(0);
    }
    data
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}

fn read_bytes(path: &Path) -> GenResult<Vec<u8>> {
    fs::read(path).map_err(|source| GenError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_text(path: &Path) -> GenResult<String> {
    fs::read_to_string(path).map_err(|source| GenError::Io {
        path: path.to_path_buf(),
        source,
    })
}
