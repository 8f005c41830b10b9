use crate::error::identity::ApplicationKeyError;
use crate::error::identity::ApplicationKeyError::{
    DecodeHexFailed, DeserializeKeyFailed, GenerateKeyFailed, KeyRejected, PublicKeyMismatch,
};
use candid::Principal;
use ic_agent::agent::EnvelopeContent;
use ic_agent::identity::Delegation;
use ic_agent::Signature;
use ring::rand::SystemRandom;
use ring::signature::{Ed25519KeyPair, KeyPair};
use std::fmt;

/// DER prefix of an ed25519 SubjectPublicKeyInfo (RFC 8410).
const ED25519_DER_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

pub fn der_encode_ed25519_public_key(raw_public_key: &[u8]) -> Vec<u8> {
    let mut der = Vec::with_capacity(ED25519_DER_PREFIX.len() + raw_public_key.len());
    der.extend_from_slice(&ED25519_DER_PREFIX);
    der.extend_from_slice(raw_public_key);
    der
}

/// The ephemeral device-local keypair that receives delegated authority.
pub struct ApplicationKey {
    key_pair: Ed25519KeyPair,
    pkcs8: Vec<u8>,
}

impl ApplicationKey {
    pub fn generate() -> Result<Self, ApplicationKeyError> {
        let rng = SystemRandom::new();
        let document = Ed25519KeyPair::generate_pkcs8(&rng).map_err(GenerateKeyFailed)?;
        Self::from_pkcs8(document.as_ref())
    }

    pub fn from_pkcs8(pkcs8: &[u8]) -> Result<Self, ApplicationKeyError> {
        let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8).map_err(KeyRejected)?;
        Ok(Self {
            key_pair,
            pkcs8: pkcs8.to_vec(),
        })
    }

    /// Parses the stored form `["<public key hex>", "<pkcs8 hex>"]`.
    pub fn from_json(json: &str) -> Result<Self, ApplicationKeyError> {
        let [public_key, secret_key]: [String; 2] =
            serde_json::from_str(json).map_err(DeserializeKeyFailed)?;
        let public_key = hex::decode(public_key).map_err(DecodeHexFailed)?;
        let secret_key = hex::decode(secret_key).map_err(DecodeHexFailed)?;

        let key = Self::from_pkcs8(&secret_key)?;
        if key.raw_public_key() != public_key.as_slice() {
            return Err(PublicKeyMismatch());
        }
        Ok(key)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&[
            hex::encode(self.raw_public_key()),
            hex::encode(&self.pkcs8),
        ])
    }

    pub fn raw_public_key(&self) -> &[u8] {
        self.key_pair.public_key().as_ref()
    }

    pub fn public_key_der(&self) -> Vec<u8> {
        der_encode_ed25519_public_key(self.raw_public_key())
    }

    pub fn sign_bytes(&self, message: &[u8]) -> Vec<u8> {
        self.key_pair.sign(message).as_ref().to_vec()
    }

    fn signature(&self, message: &[u8]) -> Signature {
        Signature {
            public_key: Some(self.public_key_der()),
            signature: Some(self.sign_bytes(message)),
            delegations: None,
        }
    }
}

impl fmt::Debug for ApplicationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationKey")
            .field("public_key", &hex::encode(self.raw_public_key()))
            .finish_non_exhaustive()
    }
}

impl ic_agent::Identity for ApplicationKey {
    fn sender(&self) -> Result<Principal, String> {
        Ok(Principal::self_authenticating(self.public_key_der()))
    }

    fn public_key(&self) -> Option<Vec<u8>> {
        Some(self.public_key_der())
    }

    fn sign(&self, content: &EnvelopeContent) -> Result<Signature, String> {
        Ok(self.signature(&content.to_request_id().signable()))
    }

    fn sign_delegation(&self, content: &Delegation) -> Result<Signature, String> {
        Ok(self.signature(&content.signable()))
    }

    fn sign_arbitrary(&self, content: &[u8]) -> Result<Signature, String> {
        Ok(self.signature(content))
    }
}
