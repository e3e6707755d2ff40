//! Errors raised by the outer surfaces (text loading, config, terminal).
//! The typing session itself never fails.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaperError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read {path}: {source}")]
    ReadText {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{0} contains no text to type")]
    EmptyText(PathBuf),

    #[error("stdin must be a tty")]
    NotATty,
}

pub type Result<T> = std::result::Result<T, PaperError>;
