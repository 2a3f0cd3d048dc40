use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Rejected configuration, detected before any sampling starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("item count must be greater than zero")]
    ZeroItemCount,
    #[error("sample iterations must be at least 1")]
    ZeroIterations,
    #[error("grouping chance table is empty")]
    EmptyGroupingChance,
    #[error("grouping chance table {0:?} has no positive chunk size")]
    NoPositiveChunk(Vec<usize>),
    #[error("matrix is {actual}x{actual} but the item count is {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("unknown grouping preset '{0}'")]
    UnknownPreset(String),
    #[error("unknown output format '{0}'")]
    UnknownFormat(String),
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum ShuffleError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("entropy source unavailable: {0}")]
    EntropySource(#[source] getrandom::Error),
    #[error("failed to write output: {0}")]
    SinkWrite(#[from] io::Error),
}

pub type ShuffleResult<T> = Result<T, ShuffleError>;
