//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Course schedule generator.
///
/// Expands recurring course rules, exported from a spreadsheet as a JSON array
/// of rows, into the concrete dated sessions they imply.
#[derive(Debug, Parser)]
#[command(name = "sg", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Expand rule rows into session records.
    Generate {
        /// Rule rows as a JSON array (`-` for stdin). Overrides `input_path`.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Destination for session records (`-` for stdout). Overrides `output_path`.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write one JSON object per line instead of a JSON array.
        #[arg(long)]
        jsonl: bool,
    },

    /// Report which rule rows expand and which are skipped, without writing output.
    Check {
        /// Rule rows as a JSON array (`-` for stdin). Overrides `input_path`.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
