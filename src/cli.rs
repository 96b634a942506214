//! CLI command definitions for the `zero-config` inspection tool.
//!
//! The binary resolves a configuration the same way an embedding application
//! would and prints the result, which makes precedence questions ("where did
//! this value come from?") answerable from a shell.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Zero-config inspection tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and print the merged configuration as JSON
    Inspect(InspectArgs),

    /// Print the detected project root and the marker that selected it
    Root {
        /// Directory to start detection from (default: current directory)
        dir: Option<PathBuf>,
    },
}

/// Arguments for the `inspect` subcommand.
#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Defaults file containing a JSON object (nested or dotted keys)
    #[arg(short, long)]
    pub defaults: Option<PathBuf>,

    /// Override file to apply, repeatable, in ascending priority order
    #[arg(short, long = "env-file")]
    pub env_files: Vec<PathBuf>,

    /// Directory to start project-root detection from
    #[arg(short, long)]
    pub start_dir: Option<PathBuf>,

    /// Print flat dotted keys instead of the nested tree
    #[arg(long)]
    pub flat: bool,
}
