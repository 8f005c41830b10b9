use crate::error::storage::FindValueError::{PurgeFailed, ReadFailed};
use crate::error::storage::SaveValueError::{SerializeFailed, WriteFailed};
use crate::error::storage::{FindValueError, RemoveValueError, RetrieveValueError, SaveValueError};
use crate::identity::DelegationChain;
use crate::storage::Storage;
use slog::{info, warn, Logger};
use std::sync::Arc;

/// Persists the delegation chain received from the provider.
///
/// [`DelegationStorage::find`] only ever returns a chain that is valid at the time of
/// the call: expired or unreadable records are deleted on sight.
#[derive(Clone)]
pub struct DelegationStorage {
    log: Logger,
    storage: Arc<dyn Storage>,
    key: String,
}

impl DelegationStorage {
    pub fn new(log: Logger, storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            log,
            storage,
            key: key.into(),
        }
    }

    pub async fn find(&self) -> Result<Option<DelegationChain>, FindValueError> {
        let stored = self
            .storage
            .find(&self.key)
            .await
            .map_err(|err| ReadFailed(self.key.clone(), err))?;
        let Some(json) = stored else {
            return Ok(None);
        };

        match DelegationChain::from_json(&json) {
            Ok(chain) if chain.is_valid() => Ok(Some(chain)),
            Ok(_) => {
                info!(self.log, "Delegation chain expired, removing it");
                self.purge().await?;
                Ok(None)
            }
            Err(err) => {
                warn!(self.log, "Removing unreadable delegation chain: {}", err);
                self.purge().await?;
                Ok(None)
            }
        }
    }

    pub async fn retrieve(&self) -> Result<DelegationChain, RetrieveValueError> {
        self.find()
            .await?
            .ok_or_else(|| RetrieveValueError::NotFound(self.key.clone()))
    }

    pub async fn save(&self, chain: &DelegationChain) -> Result<(), SaveValueError> {
        let json = chain
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

    async fn purge(&self) -> Result<(), FindValueError> {
        self.storage
            .remove(&self.key)
            .await
            .map_err(|err| PurgeFailed(self.key.clone(), err))
    }
}
