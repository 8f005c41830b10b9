use crate::error::storage::{RetrieveValueError, SaveValueError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplicationKeyError {
    #[error("Failed to decode application key hex")]
    DecodeHexFailed(#[source] hex::FromHexError),

    #[error("Failed to parse application key JSON")]
    DeserializeKeyFailed(#[source] serde_json::Error),

    #[error("Failed to generate a fresh ed25519 key")]
    GenerateKeyFailed(#[source] ring::error::Unspecified),

    #[error("Application key material was rejected")]
    KeyRejected(#[source] ring::error::KeyRejected),

    #[error("Stored public key does not match the private key")]
    PublicKeyMismatch(),
}

#[derive(Error, Debug)]
pub enum DelegationChainError {
    #[error("Failed to decode hex field '{0}'")]
    DecodeHexFailed(&'static str, #[source] hex::FromHexError),

    #[error("Failed to parse delegation chain JSON")]
    DeserializeChainFailed(#[source] serde_json::Error),

    #[error("Delegation chain contains no delegations")]
    EmptyChain(),

    #[error("Invalid delegation expiration '{0}'")]
    InvalidExpiration(String, #[source] std::num::ParseIntError),

    #[error("Invalid delegation target '{0}'")]
    InvalidTarget(String, #[source] candid::types::principal::PrincipalError),
}

#[derive(Error, Debug)]
pub enum BuildIdentityError {
    #[error("Authentication expired: the delegation chain is no longer valid")]
    AuthenticationExpired(),

    #[error("last delegation public key does not match app key")]
    DelegationMismatch(),

    #[error("Failed to parse delegation")]
    ParseDelegationFailed(#[from] DelegationChainError),

    #[error("Failed to retrieve app key")]
    RetrieveAppKeyFailed(#[from] RetrieveValueError),

    #[error("Failed to save delegation")]
    SaveDelegationFailed(#[from] SaveValueError),
}

impl BuildIdentityError {
    pub fn is_authentication_expired(&self) -> bool {
        matches!(self, BuildIdentityError::AuthenticationExpired())
    }
}
