use crate::error::identity::BuildIdentityError;
use crate::error::identity::BuildIdentityError::{AuthenticationExpired, DelegationMismatch};
use crate::identity::delegated::DelegatedAppIdentity;
use crate::identity::delegation::DelegationChain;
use crate::identity::key::ApplicationKey;
use crate::storage::{AppKeyStorage, DelegationStorage};
use slog::{debug, Logger};

/// Byte-for-byte key comparison; keys of different lengths are simply unequal.
pub fn public_keys_equal(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Combines an application key with a delegation chain.
///
/// The chain must terminate in the application key and must not have expired.
pub fn build_identity(
    app_key: ApplicationKey,
    chain: DelegationChain,
) -> Result<DelegatedAppIdentity, BuildIdentityError> {
    if !public_keys_equal(chain.terminal_public_key(), &app_key.public_key_der()) {
        return Err(DelegationMismatch());
    }
    if !chain.is_valid() {
        return Err(AuthenticationExpired());
    }
    Ok(DelegatedAppIdentity::new(app_key, chain))
}

/// Builds an identity from a delegation delivered by the provider and, once it
/// checks out against the stored application key, persists the chain.
pub async fn build_identity_from_delegation(
    log: &Logger,
    delegation: &str,
    delegation_storage: &DelegationStorage,
    app_key_storage: &AppKeyStorage,
) -> Result<DelegatedAppIdentity, BuildIdentityError> {
    let chain = DelegationChain::from_json(delegation)?;
    let app_key = app_key_storage.retrieve().await?;

    let identity = build_identity(app_key, chain)?;
    delegation_storage.save(identity.chain()).await?;
    debug!(log, "Saved delegation for principal {}", identity.principal());

    Ok(identity)
}
