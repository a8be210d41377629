use std::path::PathBuf;

use clap::Parser;

/// Parses and lowers a dataflow pipeline definition file.
#[derive(Debug, Parser)]
#[command(name = "flowc", version, about)]
pub struct Cli {
    /// Path to the source file to process.
    pub input_file: PathBuf,
}
