use crate::error::storage::FindValueError::ReadFailed;
use crate::error::storage::SaveValueError::WriteFailed;
use crate::error::storage::{FindValueError, RemoveValueError, RetrieveValueError, SaveValueError};
use crate::storage::Storage;
use std::sync::Arc;

/// A plain string stored under a fixed key.
#[derive(Clone)]
pub struct StringValueStorage {
    storage: Arc<dyn Storage>,
    key: String,
}

impl StringValueStorage {
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub async fn find(&self) -> Result<Option<String>, FindValueError> {
        self.storage
            .find(&self.key)
            .await
            .map_err(|err| ReadFailed(self.key.clone(), err))
    }

    pub async fn retrieve(&self) -> Result<String, RetrieveValueError> {
        self.find()
            .await?
            .ok_or_else(|| RetrieveValueError::NotFound(self.key.clone()))
    }

    pub async fn save(&self, value: &str) -> Result<(), SaveValueError> {
        self.storage
            .save(&self.key, value)
            .await
            .map_err(|err| WriteFailed(self.key.clone(), err))
    }

    pub async fn remove(&self) -> Result<(), RemoveValueError> {
        self.storage
            .remove(&self.key)
            .await
            .map_err(|source| RemoveValueError {
                key: self.key.clone(),
                source,
            })
    }
}
