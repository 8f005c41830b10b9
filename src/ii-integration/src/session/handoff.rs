use crate::error::handoff::HandoffError;
use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    pub fn is_native(&self) -> bool {
        !matches!(self, Platform::Web)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Web => "web",
        })
    }
}

/// In-app browser used on native platforms. The delegation comes back through a deep
/// link, not through this interface.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn open(&self, url: &Url) -> Result<(), HandoffError>;

    async fn dismiss(&self);
}

/// Cross-window channel to the authentication page, used on the web.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Registers where success responses go. Called before [`Messenger::open`] on every
    /// login; sinks from earlier logins may be kept or dropped.
    fn on_success(&self, sink: UnboundedSender<MessengerResponse>);

    async fn open(&self, url: &Url) -> Result<(), HandoffError>;

    /// Closes the window and drops the registered sinks.
    async fn close(&self);
}

/// Message posted back by the authentication page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MessengerResponse {
    Success { delegation: String },
}

#[derive(Clone)]
pub enum Handoff {
    Native(Arc<dyn Browser>),
    Web(Arc<dyn Messenger>),
}

impl fmt::Debug for Handoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handoff::Native(_) => f.write_str("Handoff::Native"),
            Handoff::Web(_) => f.write_str("Handoff::Web"),
        }
    }
}
