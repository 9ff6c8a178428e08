use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Resolve video renditions and stream downloads with progress")]
pub struct Cli {
    /// Override the remote service base URL
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Override the history database path
    #[arg(long, global = true)]
    pub history_path: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a video URL and list its downloadable renditions
    Info { url: String },
    /// Resolve a video URL and download one rendition
    Download {
        url: String,
        /// Rendition to download; defaults to the first one offered
        #[arg(long)]
        format: Option<String>,
        /// Directory the finished file is saved into
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the most recent completed downloads
    History,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
