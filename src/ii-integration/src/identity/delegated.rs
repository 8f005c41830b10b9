use crate::identity::delegation::DelegationChain;
use crate::identity::key::ApplicationKey;
use candid::Principal;
use ic_agent::agent::EnvelopeContent;
use ic_agent::identity::{Delegation, DelegatedIdentity, SignedDelegation};
use ic_agent::{Identity, Signature};
use std::fmt;

/// An application key acting on behalf of the principal a delegation chain is rooted at.
///
/// Signing is done by ic-agent's [`DelegatedIdentity`]; the chain is kept alongside
/// so it can be persisted. Never persisted itself: it is rebuilt from its stored
/// constituents.
pub struct DelegatedAppIdentity {
    inner: DelegatedIdentity,
    chain: DelegationChain,
}

impl DelegatedAppIdentity {
    /// Callers are expected to have checked the chain against the key,
    /// see [`crate::identity::build_identity`].
    pub(crate) fn new(app_key: ApplicationKey, chain: DelegationChain) -> Self {
        let inner = DelegatedIdentity::new_unchecked(
            chain.public_key().to_vec(),
            Box::new(app_key),
            chain.delegations().to_vec(),
        );
        Self { inner, chain }
    }

    pub fn principal(&self) -> Principal {
        self.chain.principal()
    }

    pub fn chain(&self) -> &DelegationChain {
        &self.chain
    }
}

impl fmt::Debug for DelegatedAppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedAppIdentity")
            .field("principal", &self.principal().to_text())
            .finish()
    }
}

impl Identity for DelegatedAppIdentity {
    fn sender(&self) -> Result<Principal, String> {
        self.inner.sender()
    }

    fn public_key(&self) -> Option<Vec<u8>> {
        self.inner.public_key()
    }

    fn sign(&self, content: &EnvelopeContent) -> Result<Signature, String> {
        self.inner.sign(content)
    }

    fn sign_delegation(&self, content: &Delegation) -> Result<Signature, String> {
        self.inner.sign_delegation(content)
    }

    fn sign_arbitrary(&self, content: &[u8]) -> Result<Signature, String> {
        self.inner.sign_arbitrary(content)
    }

    fn delegation_chain(&self) -> Vec<SignedDelegation> {
        self.inner.delegation_chain()
    }
}
