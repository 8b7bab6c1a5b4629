use std::io;

/// Errors from solving, writing and reading tablebases.
#[derive(Debug, thiserror::Error)]
pub enum TablebaseError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed tablebase: {0}")]
    Format(String),

    #[error(transparent)]
    Position(#[from] tinyhouse_core::Error),
}

pub type Result<T> = std::result::Result<T, TablebaseError>;
