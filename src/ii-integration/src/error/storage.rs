use crate::error::io::IoError;
use crate::error::structured_file::StructuredFileError;
use thiserror::Error;

/// Failure reported by a key-value storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend failed: {0}")]
    BackendFailed(String),

    #[error("Cannot find home directory (no HOME environment variable).")]
    NoHomeInEnvironment(),

    #[error("Failed to prepare storage file")]
    PrepareStorageFileFailed(#[source] IoError),

    #[error("Failed to access storage file")]
    StorageFileFailed(#[from] StructuredFileError),
}

#[derive(Error, Debug)]
pub enum FindValueError {
    #[error("Failed to read '{0}' from storage")]
    ReadFailed(String, #[source] StorageError),

    #[error("Failed to purge invalid value '{0}' from storage")]
    PurgeFailed(String, #[source] StorageError),
}

#[derive(Error, Debug)]
pub enum RetrieveValueError {
    #[error(transparent)]
    Find(#[from] FindValueError),

    #[error("No value found for key {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum SaveValueError {
    #[error("Failed to serialize value for '{0}'")]
    SerializeFailed(String, #[source] serde_json::Error),

    #[error("Failed to write '{0}' to storage")]
    WriteFailed(String, #[source] StorageError),
}

#[derive(Error, Debug)]
#[error("Failed to remove '{key}' from storage")]
pub struct RemoveValueError {
    pub key: String,
    pub source: StorageError,
}
