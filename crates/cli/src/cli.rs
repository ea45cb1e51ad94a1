use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Which library root a scan walks.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ScanRoot {
    Movies,
    Series,
}

#[derive(Parser)]
#[command(name = "mediaflix")]
#[command(about = "Organize local media files and resolve posters/metadata from TMDB")]
#[command(version)]
pub struct Cli {
    /// Configuration file path (falls back to MEDIAFLIX_CONFIG, then
    /// mediaflix.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Move downloaded files into the Movies/Series layout
    Organize,

    /// Index a library root and print each entry with its metadata
    Scan {
        /// Which configured root to scan
        #[arg(long, default_value = "movies")]
        root: ScanRoot,
    },

    /// List series directories with episode counts and synopses
    Series,

    /// Delete every cached poster and synopsis file
    ClearCache,
}
