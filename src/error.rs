use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Input file not found: '{}'", .0.display())]
    InputNotFound(PathBuf),
    #[error("I/O error on '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid draft document '{}'", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DraftError {
    /// Process exit code for this failure. Zero is reserved for success.
    pub fn exit_code(&self) -> i32 {
        match self {
            DraftError::InputNotFound(_) => 2,
            DraftError::Io { .. } | DraftError::Json { .. } => 1,
        }
    }
}
