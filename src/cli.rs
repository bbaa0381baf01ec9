use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "subgrid",
    version,
    about = "Inspect and build subdivision grid caches"
)]
pub struct Cli {
    /// Log filter (overridden by RUST_LOG when set)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the element and grid layout for a configuration
    Layout {
        #[arg(long, default_value_t = 2)]
        level: u32,
        #[arg(long)]
        normals: bool,
        #[arg(long)]
        mask: bool,
    },
    /// Build a cache from a TOML description and report on it
    Build {
        config: PathBuf,
        /// Export grids sampled at this level instead of the top level
        #[arg(long)]
        level: Option<u32>,
        /// Write the raw grid bytes to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
