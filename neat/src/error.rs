use std::io;

/// Everything that can go wrong while configuring, running or persisting an
/// evolution. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum NeatError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("binary codec error: {0}")]
    Codec(#[from] postcard::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("every species went stagnant and extinction reset is disabled")]
    Extinction,
    #[error("no genome was ever evaluated")]
    NoBest,
}

pub type Result<T> = std::result::Result<T, NeatError>;
