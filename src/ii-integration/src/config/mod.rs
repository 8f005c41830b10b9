//! Integration settings, usually shipped with the app as a JSON file.
use crate::error::config::LoadConfigError;
use crate::error::config::LoadConfigError::ParseConfigFailed;
use crate::json::load_json_file;
use crate::session::handoff::Platform;
use crate::url::{CallbackBindingKind, DeepLinkType, ProviderNetwork};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_NAMESPACE: &str = "expo-ii-integration";
pub const DEFAULT_AUTH_PATH: &str = "/";

pub const APP_KEY_SUFFIX: &str = "appKey";
pub const DELEGATION_SUFFIX: &str = "delegation";
pub const REDIRECT_PATH_SUFFIX: &str = "redirectPath";
pub const SESSION_ID_SUFFIX: &str = "sessionId";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IntegrationConfig {
    /// Canister serving the authentication page.
    pub ii_integration_canister_id: String,
    pub frontend_canister_id: String,
    pub network: ProviderNetwork,
    /// The app's own deep link, used to infer the deep link type.
    pub deep_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_link_type: Option<DeepLinkType>,
    #[serde(default = "default_auth_path")]
    pub auth_path: String,
    pub platform: Platform,
    #[serde(default)]
    pub callback_binding: CallbackBindingKind,
    /// Prefix of every storage key.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_auth_path() -> String {
    DEFAULT_AUTH_PATH.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl IntegrationConfig {
    pub fn load(path: &Path) -> Result<Self, LoadConfigError> {
        Ok(load_json_file(path)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadConfigError> {
        serde_json::from_str(json).map_err(ParseConfigFailed)
    }

    pub fn storage_key(&self, suffix: &str) -> String {
        format!("{}.{}", self.namespace, suffix)
    }
}
