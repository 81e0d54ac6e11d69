//! Built-in init data generator
//!
//! Reads built-in string and object metadata, then writes a C header, a C
//! source file and a JSON build summary. RAM init data is always produced;
//! ROM static initializers only with `--rom-support`.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use genbuiltins::{run, Cli};
//!
//! let cli = Cli::parse();
//! run(&cli).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod build_info;
pub mod cli;
pub mod error;
pub mod generator;
pub mod inputs;
pub mod summary;

pub use build_info::BuildInfo;
pub use cli::Cli;
pub use error::{GenError, GenResult};
pub use generator::{GeneratedOutputs, Generator};
pub use inputs::Inputs;
pub use summary::BuildSummary;

use std::fs;
use std::path::Path;
use tracing::info;

/// Read inputs, generate, then write every output
pub fn run(cli: &Cli) -> GenResult<()> {
    let inputs = Inputs::read(cli)?;
    let outputs = Generator::new(inputs)
        .with_rom_support(cli.rom_support)
        .with_dumps(
            cli.dev_dump_final_ram_metadata.is_some(),
            cli.dev_dump_final_rom_metadata.is_some(),
        )
        .generate()?;

    write_output(&cli.out_source, &outputs.source)?;
    write_output(&cli.out_header, &outputs.header)?;
    write_output(&cli.out_metadata_json, &outputs.metadata_json)?;
    if let (Some(path), Some(dump)) = (&cli.dev_dump_final_ram_metadata, &outputs.ram_dump) {
        write_output(path, dump)?;
    }
    if let (Some(path), Some(dump)) = (&cli.dev_dump_final_rom_metadata, &outputs.rom_dump) {
        write_output(path, dump)?;
    }
    Ok(())
}

fn write_output(path: &Path, text: &str) -> GenResult<()> {
    fs::write(path, text).map_err(|source| GenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote {}", path.display());
    Ok(())
}
