use std::path::PathBuf;

use thiserror::Error;

/// Failures the pipeline distinguishes between. Only `MissingDocument` and
/// (by default) `Parse` are recoverable; the aggregator decides which.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("missing document: {0}")]
    MissingDocument(PathBuf),

    #[error("failed to extract text from {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RankError {
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        RankError::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        RankError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
