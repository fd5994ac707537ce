use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectFileError {
    #[error("Failed to read project file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write project file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Truncated or corrupted project data")]
    Stream(#[from] std::io::Error),

    #[error("Failed to parse chart: {0}")]
    ChartParse(#[from] serde_json::Error),
}
