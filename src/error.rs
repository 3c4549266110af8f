use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Tracker file not found: {0:?}")]
    TrackerNotFound(PathBuf),
    #[error("Assets directory not found: {0:?}")]
    AssetsDirNotFound(PathBuf),
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize icon data: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackerError::Io {
            path: path.into(),
            source,
        }
    }

    /// Missing inputs end a run early without failing the process.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            TrackerError::TrackerNotFound(_) | TrackerError::AssetsDirNotFound(_)
        )
    }
}
