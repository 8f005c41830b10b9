use crate::error::identity::DelegationChainError;
use crate::error::identity::DelegationChainError::{
    DecodeHexFailed, DeserializeChainFailed, EmptyChain, InvalidExpiration, InvalidTarget,
};
use candid::Principal;
use ic_agent::identity::{Delegation, SignedDelegation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
struct JSONDelegation {
    expiration: String,
    pubkey: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    targets: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize)]
struct SignedJSONDelegation {
    delegation: JSONDelegation,
    signature: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct JSONDelegationChain {
    delegations: Vec<SignedJSONDelegation>,
    public_key: String,
}

impl SignedJSONDelegation {
    fn to_delegation(&self) -> Result<SignedDelegation, DelegationChainError> {
        let expiration = u64::from_str_radix(&self.delegation.expiration, 16)
            .map_err(|err| InvalidExpiration(self.delegation.expiration.clone(), err))?;
        let pubkey =
            hex::decode(&self.delegation.pubkey).map_err(|err| DecodeHexFailed("pubkey", err))?;
        let targets = self
            .delegation
            .targets
            .as_ref()
            .map(|targets| {
                targets
                    .iter()
                    .map(|t| parse_target(t))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(SignedDelegation {
            delegation: Delegation {
                expiration,
                pubkey,
                targets,
            },
            signature: hex::decode(&self.signature)
                .map_err(|err| DecodeHexFailed("signature", err))?,
        })
    }

    fn from_delegation(signed: &SignedDelegation) -> Self {
        let delegation = &signed.delegation;
        SignedJSONDelegation {
            delegation: JSONDelegation {
                expiration: format!("{:x}", delegation.expiration),
                pubkey: hex::encode(&delegation.pubkey),
                targets: delegation
                    .targets
                    .as_ref()
                    .map(|targets| targets.iter().map(|t| hex::encode(t.as_slice())).collect()),
            },
            signature: hex::encode(&signed.signature),
        }
    }
}

fn parse_target(target: &str) -> Result<Principal, DelegationChainError> {
    let bytes = hex::decode(target).map_err(|err| DecodeHexFailed("targets", err))?;
    Principal::try_from_slice(&bytes).map_err(|err| InvalidTarget(target.to_string(), err))
}

/// An ordered chain of signed delegations rooted at the provider-asserted principal key.
///
/// The JSON form is the one produced by the Internet Identity provider:
/// hex-encoded keys and signatures, expirations as hex nanoseconds since the epoch.
#[derive(Debug, Clone)]
pub struct DelegationChain {
    delegations: Vec<SignedDelegation>,
    public_key: Vec<u8>,
}

impl DelegationChain {
    pub fn new(
        public_key: Vec<u8>,
        delegations: Vec<SignedDelegation>,
    ) -> Result<Self, DelegationChainError> {
        if delegations.is_empty() {
            return Err(EmptyChain());
        }
        Ok(Self {
            delegations,
            public_key,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DelegationChainError> {
        let chain: JSONDelegationChain =
            serde_json::from_str(json).map_err(DeserializeChainFailed)?;
        let public_key =
            hex::decode(&chain.public_key).map_err(|err| DecodeHexFailed("publicKey", err))?;
        let delegations = chain
            .delegations
            .iter()
            .map(SignedJSONDelegation::to_delegation)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(public_key, delegations)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let chain = JSONDelegationChain {
            delegations: self
                .delegations
                .iter()
                .map(SignedJSONDelegation::from_delegation)
                .collect(),
            public_key: hex::encode(&self.public_key),
        };
        serde_json::to_string(&chain)
    }

    /// DER-encoded public key of the principal the chain is rooted at.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn delegations(&self) -> &[SignedDelegation] {
        &self.delegations
    }

    /// The key the chain ultimately delegates to.
    pub fn terminal_public_key(&self) -> &[u8] {
        self.delegations
            .last()
            .map(|signed| signed.delegation.pubkey.as_slice())
            .unwrap_or_default()
    }

    pub fn principal(&self) -> Principal {
        Principal::self_authenticating(&self.public_key)
    }

    /// Every delegation must expire strictly after `now_in_nanos`.
    pub fn is_valid_at(&self, now_in_nanos: u64) -> bool {
        self.delegations
            .iter()
            .all(|signed| signed.delegation.expiration > now_in_nanos)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(super::now_in_nanos())
    }
}
