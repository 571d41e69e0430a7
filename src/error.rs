use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CorpusError>;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read or write {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("taxonomy misconfigured: {0}")]
    Taxonomy(String),
}

impl CorpusError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CorpusError::Io {
            path: path.into(),
            source,
        }
    }
}
