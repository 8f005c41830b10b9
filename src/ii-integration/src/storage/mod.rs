//! Persistence of the handshake state.
//!
//! The [`Storage`] trait is the boundary to the platform's key-value store. It deals
//! in strings only; the typed wrappers in this module own the JSON encoding of the
//! values they persist.
use crate::error::storage::StorageError;
use async_trait::async_trait;

pub mod app_key;
pub mod delegation;
pub mod file;
pub mod memory;
pub mod value;

pub use app_key::AppKeyStorage;
pub use delegation::DelegationStorage;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use value::StringValueStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn find(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
