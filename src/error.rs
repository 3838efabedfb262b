use thiserror::Error;

/// Failures reported by the remote storage and by local validation of
/// names and path segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Name already in use: {0}")]
    NameConflict(String),

    #[error("Directory is not empty, confirmation required")]
    ConfirmationRequired,

    #[error("Some items could not be deleted: {0}")]
    PartialFailure(String),

    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server responded with status {status}")]
    Unknown { status: u16, body: String },
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::Transport(err.to_string())
    }
}
