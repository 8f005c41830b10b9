//! Application key, delegation chain and the delegated identity built from them.
//!
//! The application key is a device-local ed25519 keypair. The Internet Identity
//! provider delegates to its public key; the resulting [`DelegationChain`] combined
//! with the key yields a [`DelegatedAppIdentity`] that signs on behalf of the
//! principal at the root of the chain.
pub mod builder;
pub mod delegated;
pub mod delegation;
pub mod key;

pub use builder::{build_identity, build_identity_from_delegation, public_keys_equal};
pub use delegated::DelegatedAppIdentity;
pub use delegation::DelegationChain;
pub use key::ApplicationKey;

/// Current time in nanoseconds since the Unix epoch, the unit of delegation expirations.
pub(crate) fn now_in_nanos() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
