use crate::error::storage::StorageError;
use crate::error::storage::StorageError::{NoHomeInEnvironment, PrepareStorageFileFailed};
use crate::json::{load_json_file, save_json_file};
use crate::storage::Storage;
use async_trait::async_trait;
use directories_next::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

pub const STORAGE_FILE_NAME: &str = "storage.json";

fn project_dirs() -> Option<&'static ProjectDirs> {
    lazy_static::lazy_static! {
        static ref DIRS: Option<ProjectDirs> = ProjectDirs::from("org", "dfinity", "ii-integration");
    }
    DIRS.as_ref()
}

/// Keeps all values in a single JSON object on disk, readable by the owner only.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Storage file under the user's local data directory.
    pub fn in_user_data_dir() -> Result<Self, StorageError> {
        let dirs = project_dirs().ok_or(NoHomeInEnvironment())?;
        Ok(Self::new(dirs.data_local_dir().join(STORAGE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        Ok(load_json_file(&self.path)?)
    }

    fn store(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let parent = crate::fs::parent(&self.path).map_err(PrepareStorageFileFailed)?;
        crate::fs::create_dir_all(&parent).map_err(PrepareStorageFileFailed)?;
        Ok(save_json_file(&self.path, values)?)
    }

    fn update(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.load()?;
        if f(&mut values) {
            self.store(&values)?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn find(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
            true
        })
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|values| values.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn values_survive_a_new_instance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(STORAGE_FILE_NAME);

        FileStorage::new(&path)
            .save("ns.delegation", "{\"a\":1}")
            .await
            .unwrap();
        let reopened = FileStorage::new(&path);

        assert_eq!(
            reopened.find("ns.delegation").await.unwrap(),
            Some("{\"a\":1}".to_string())
        );
        assert_eq!(reopened.find("ns.appKey").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_only_touches_one_key() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join(STORAGE_FILE_NAME));
        storage.save("a", "1").await.unwrap();
        storage.save("b", "2").await.unwrap();

        storage.remove("a").await.unwrap();
        storage.remove("missing").await.unwrap();

        assert_eq!(storage.find("a").await.unwrap(), None);
        assert_eq!(storage.find("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join(STORAGE_FILE_NAME));

        assert_eq!(storage.find("anything").await.unwrap(), None);
        storage.remove("anything").await.unwrap();
        assert!(!storage.path().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn storage_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join(STORAGE_FILE_NAME));
        storage.save("a", "1").await.unwrap();

        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORAGE_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStorage::new(&path).find("a").await,
            Err(StorageError::StorageFileFailed(_))
        ));
    }
}
