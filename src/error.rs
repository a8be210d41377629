use std::path::PathBuf;

use thiserror::Error;

/// Errors that belong to the CLI collaborator itself, not to parsing or
/// workflow building (those are reported as diagnostics, never as a
/// `Result`).
#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read '{path}': {source}")]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
