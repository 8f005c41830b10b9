use thiserror::Error;

/// Failure reported by a browser or messenger collaborator.
#[derive(Error, Debug)]
pub enum HandoffError {
    #[error("Failed to open browser: {0}")]
    OpenBrowserFailed(String),

    #[error("Failed to open messenger window: {0}")]
    OpenMessengerFailed(String),
}
