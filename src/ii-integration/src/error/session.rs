use crate::error::handoff::HandoffError;
use crate::error::identity::{ApplicationKeyError, BuildIdentityError};
use crate::error::storage::{FindValueError, RemoveValueError, SaveValueError};
use crate::error::url::BuildUrlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedirectPathError {
    #[error("Failed to find redirect path")]
    FindFailed(#[source] FindValueError),

    #[error("Failed to remove redirect path")]
    RemoveFailed(#[source] RemoveValueError),

    #[error("Failed to save redirect path")]
    SaveFailed(#[source] SaveValueError),
}

/// Failure while rebuilding the session from persisted state.
#[derive(Error, Debug)]
pub enum RestoreSessionError {
    #[error("Failed to build identity from storage")]
    BuildIdentityFailed(#[source] BuildIdentityError),

    #[error("Failed to find app key")]
    FindAppKeyFailed(#[source] FindValueError),

    #[error("Failed to find delegation")]
    FindDelegationFailed(#[source] FindValueError),

    #[error("Failed to generate app key")]
    GenerateAppKeyFailed(#[source] ApplicationKeyError),

    #[error("Failed to purge delegation")]
    PurgeDelegationFailed(#[source] RemoveValueError),

    #[error("Failed to save app key")]
    SaveAppKeyFailed(#[source] SaveValueError),
}

#[derive(Error, Debug)]
pub enum InitializeError {
    #[error("Session is already initialized")]
    AlreadyInitialized(),

    #[error(transparent)]
    RestoreSession(#[from] RestoreSessionError),
}

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Failed to build II integration url")]
    BuildUrlFailed(#[from] BuildUrlError),

    #[error("Failed to generate app key")]
    GenerateAppKeyFailed(#[source] ApplicationKeyError),

    #[error("Failed to generate session id")]
    GenerateSessionIdFailed(#[source] ring::error::Unspecified),

    #[error("Failed to hand off to the authentication page")]
    HandoffFailed(#[from] HandoffError),

    #[error("Failed to save app key")]
    SaveAppKeyFailed(#[source] SaveValueError),

    #[error("Failed to store redirect path")]
    SaveRedirectPathFailed(#[source] RedirectPathError),

    #[error("Failed to save session id")]
    SaveSessionIdFailed(#[source] SaveValueError),
}

#[derive(Error, Debug)]
pub enum HandleCallbackError {
    #[error("Failed to build identity from delegation")]
    BuildIdentityFailed(#[from] BuildIdentityError),

    #[error("Failed to consume redirect path")]
    ConsumeRedirectPathFailed(#[source] RedirectPathError),

    #[error("Failed to find session id")]
    FindSessionIdFailed(#[source] FindValueError),

    #[error("Failed to remove session id")]
    RemoveSessionIdFailed(#[source] RemoveValueError),
}

#[derive(Error, Debug)]
pub enum LogoutError {
    #[error("Failed to remove delegation")]
    RemoveDelegationFailed(#[source] RemoveValueError),
}
