//! Command line options

use clap::Parser;
use std::path::PathBuf;

/// Built-in init data generator
#[derive(Parser, Debug)]
#[command(name = "genbuiltins", author, version, about, long_about = None)]
pub struct Cli {
    /// Build info, JSON with `version` and `git_describe`
    #[arg(long, value_name = "FILE")]
    pub buildinfo: PathBuf,

    /// Script fragment to embed as InitJS data
    #[arg(long, value_name = "FILE")]
    pub initjs_data: Option<PathBuf>,

    /// String defines referenced by runtime sources, JSON
    #[arg(long, value_name = "FILE")]
    pub used_stridx_metadata: PathBuf,

    /// Built-in strings metadata, YAML
    #[arg(long, value_name = "FILE")]
    pub strings_metadata: PathBuf,

    /// Built-in objects metadata, YAML
    #[arg(long, value_name = "FILE")]
    pub objects_metadata: PathBuf,

    /// User strings and objects, YAML (repeat for several overrides)
    #[arg(long, value_name = "FILE")]
    pub user_builtin_metadata: Vec<PathBuf>,

    /// Emit ROM string and object initializers
    #[arg(long)]
    pub rom_support: bool,

    /// Output header file
    #[arg(long, value_name = "FILE")]
    pub out_header: PathBuf,

    /// Output source file
    #[arg(long, value_name = "FILE")]
    pub out_source: PathBuf,

    /// Output build metadata, JSON
    #[arg(long, value_name = "FILE")]
    pub out_metadata_json: PathBuf,

    /// Dump the finalized RAM metadata as JSON
    #[arg(long, value_name = "FILE")]
    pub dev_dump_final_ram_metadata: Option<PathBuf>,

    /// Dump the finalized ROM metadata as JSON
    #[arg(long, value_name = "FILE")]
    pub dev_dump_final_rom_metadata: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
