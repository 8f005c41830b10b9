use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoErrorKind {
    #[error("Failed to create {0}: {1}")]
    CreateDirectoryFailed(PathBuf, std::io::Error),

    #[error("Failed to create file {0}: {1}")]
    CreateFileFailed(PathBuf, std::io::Error),

    #[error("Cannot determine parent folder for {0}")]
    NoParent(PathBuf),

    #[error("Failed to read {0}: {1}")]
    ReadFileFailed(PathBuf, std::io::Error),

    #[error("Failed to read permissions of {0}: {1}")]
    ReadPermissionsFailed(PathBuf, std::io::Error),

    #[error("Failed to rename {0} to {1}: {2}")]
    RenameFailed(Box<PathBuf>, Box<PathBuf>, std::io::Error),

    #[error("Failed to write to {0}: {1}")]
    WriteFileFailed(PathBuf, std::io::Error),

    #[error("Failed to set permissions of {0}: {1}")]
    WritePermissionsFailed(PathBuf, std::io::Error),
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct IoError(pub Box<IoErrorKind>);

impl IoError {
    pub fn new(kind: IoErrorKind) -> Self {
        IoError(Box::new(kind))
    }

    pub fn kind(&self) -> &IoErrorKind {
        &self.0
    }
}

impl From<IoErrorKind> for IoError {
    fn from(kind: IoErrorKind) -> Self {
        IoError::new(kind)
    }
}
