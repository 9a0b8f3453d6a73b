//! Command line argument parsing for the docfield CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Docfield - read and write fields of JSON documents
#[derive(Parser, Debug, Clone)]
#[command(name = "docfield")]
#[command(about = "Read and write fields of JSON documents by field path")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct DocfieldArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", env = "DOCFIELD_FORMAT")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl DocfieldArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the value at a dotted field path
    Get(GetArgs),

    /// Print every leaf field path and its value
    Flatten(FlattenArgs),

    /// Set a patch document over a document
    Merge(MergeArgs),

    /// Apply dotted-path updates to a document
    Update(UpdateArgs),
}

/// Arguments for reading one field
#[derive(Parser, Debug, Clone)]
pub struct GetArgs {
    /// JSON document file
    pub file: PathBuf,

    /// Dotted field path, e.g. address.city
    pub path: String,
}

/// Arguments for flattening a document
#[derive(Parser, Debug, Clone)]
pub struct FlattenArgs {
    /// JSON document file
    pub file: PathBuf,
}

/// Arguments for merging a patch into a document
#[derive(Parser, Debug, Clone)]
pub struct MergeArgs {
    /// JSON document file
    pub file: PathBuf,

    /// JSON patch file
    pub patch: PathBuf,

    /// Only merge these dotted paths from the patch
    #[arg(long, value_delimiter = ',', conflicts_with = "overwrite")]
    pub fields: Vec<String>,

    /// Replace the document instead of merging
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for updating a document by field path
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// JSON document file
    pub file: PathBuf,

    /// JSON object whose keys are dotted field paths
    pub updates: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
