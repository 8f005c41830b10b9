use crate::error::storage::FindValueError::ReadFailed;
use crate::error::storage::SaveValueError::{SerializeFailed, WriteFailed};
use crate::error::storage::{FindValueError, RemoveValueError, RetrieveValueError, SaveValueError};
use crate::identity::ApplicationKey;
use crate::storage::Storage;
use slog::{warn, Logger};
use std::sync::Arc;

/// Persists the application key. Meant to sit on top of the platform's secure storage.
#[derive(Clone)]
pub struct AppKeyStorage {
    log: Logger,
    storage: Arc<dyn Storage>,
    key: String,
}

impl AppKeyStorage {
    pub fn new(log: Logger, storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            log,
            storage,
            key: key.into(),
        }
    }

    /// A stored value that no longer parses as a key counts as absent; the next
    /// generated key overwrites it.
    pub async fn find(&self) -> Result<Option<ApplicationKey>, FindValueError> {
        let stored = self
            .storage
            .find(&self.key)
            .await
            .map_err(|err| ReadFailed(self.key.clone(), err))?;

        Ok(stored.and_then(|json| match ApplicationKey::from_json(&json) {
            Ok(app_key) => Some(app_key),
            Err(err) => {
                warn!(self.log, "Ignoring unreadable app key '{}': {}", self.key, err);
                None
            }
        }))
    }

    pub async fn retrieve(&self) -> Result<ApplicationKey, RetrieveValueError> {
        self.find()
            .await?
            .ok_or_else(|| RetrieveValueError::NotFound(self.key.clone()))
    }

    pub async fn save(&self, app_key: &ApplicationKey) -> Result<(), SaveValueError> {
        let json = app_key
            .to_json()
            .map_err(|err| SerializeFailed(self.key.clone(), err))?;
        self.storage
            .save(&self.key, &json)
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
