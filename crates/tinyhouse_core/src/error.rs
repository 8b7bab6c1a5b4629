/// Errors raised by position setup and validated move application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),
}

pub type Result<T> = std::result::Result<T, Error>;
