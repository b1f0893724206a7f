use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems reading a station file. Bad cells are not errors; they
/// become NaN.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("loader thread stopped before finishing")]
    WorkerPanicked,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
