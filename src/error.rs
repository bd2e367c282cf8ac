//! Error types for the condenser.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CondenserError {
    #[error("Unable to open input {}", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input is empty, nothing to condense")]
    InputEmpty,

    #[error("Unable to open output {}", path.display())]
    OutputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input")]
    Io(#[source] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
