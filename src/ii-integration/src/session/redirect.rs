use crate::error::session::RedirectPathError;
use crate::error::session::RedirectPathError::{FindFailed, RemoveFailed, SaveFailed};
use crate::storage::StringValueStorage;

/// Per-login input from the caller's navigation context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginParams {
    /// The route the app is showing when login starts.
    pub current_path: String,
    /// `Some("")` clears any stored path, `None` falls back to `current_path`.
    pub redirect_path: Option<String>,
}

impl LoginParams {
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            redirect_path: None,
        }
    }

    pub fn with_redirect_path(mut self, redirect_path: impl Into<String>) -> Self {
        self.redirect_path = Some(redirect_path.into());
        self
    }
}

pub async fn save_redirect_path(
    storage: &StringValueStorage,
    params: &LoginParams,
) -> Result<(), RedirectPathError> {
    match params.redirect_path.as_deref() {
        Some("") => storage.remove().await.map_err(RemoveFailed),
        Some(path) => storage.save(path).await.map_err(SaveFailed),
        None => storage
            .save(&params.current_path)
            .await
            .map_err(SaveFailed),
    }
}

/// Returns the stored path and removes it.
pub async fn consume_redirect_path(
    storage: &StringValueStorage,
) -> Result<Option<String>, RedirectPathError> {
    let path = storage.find().await.map_err(FindFailed)?;
    if path.is_some() {
        storage.remove().await.map_err(RemoveFailed)?;
    }
    Ok(path.filter(|path| !path.is_empty()))
}
