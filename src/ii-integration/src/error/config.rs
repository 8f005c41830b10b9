use crate::error::structured_file::StructuredFileError;
use crate::session::handoff::Platform;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadConfigError {
    #[error("Failed to load integration config")]
    LoadConfigFileFailed(#[from] StructuredFileError),

    #[error("Failed to parse integration config")]
    ParseConfigFailed(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum BuildIntegrationError {
    #[error("No browser configured for platform '{0}'")]
    MissingBrowser(Platform),

    #[error("No messenger configured for platform '{0}'")]
    MissingMessenger(Platform),

    #[error("No regular storage configured")]
    MissingRegularStorage(),

    #[error("No secure storage configured")]
    MissingSecureStorage(),
}
