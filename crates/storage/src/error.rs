use searchbench_core::Error as CoreError;
use thiserror::Error;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to open benchmark store at {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("Failed to append benchmark entry: {0}")]
    WriteFailed(String),

    #[error("Failed to read benchmark history: {0}")]
    ReadFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::WriteFailed(_) | StorageError::SerializationError(_) => {
                CoreError::store_write(err.to_string())
            }
            StorageError::OpenFailed { .. } | StorageError::ReadFailed(_) => {
                CoreError::storage(err.to_string())
            }
        }
    }
}
