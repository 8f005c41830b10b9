use crate::error::url::BuildUrlError;
use crate::error::url::BuildUrlError::ParseProviderUrlFailed;
use serde::{Deserialize, Serialize};
use url::Host::Domain;
use url::Url;

const LOCAL_REPLICA_HTTPS_PORT: u16 = 14943;
const MAINNET_GATEWAY: &str = "https://icp0.io";

/// Where the integration canister is served from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProviderNetwork {
    /// A local replica reached over the LAN from a device or simulator.
    #[serde(rename_all = "kebab-case")]
    Local { local_ip_address: String },
    Ic,
    Custom { url: String },
}

impl ProviderNetwork {
    /// Origin of the frontend served by `canister_id` on this network.
    pub fn frontend_url(&self, canister_id: &str) -> Result<Url, BuildUrlError> {
        match self {
            ProviderNetwork::Local { local_ip_address } => {
                let origin = format!(
                    "https://{}:{}/?canisterId={}",
                    local_ip_address, LOCAL_REPLICA_HTTPS_PORT, canister_id
                );
                Url::parse(&origin).map_err(|err| ParseProviderUrlFailed(origin, err))
            }
            ProviderNetwork::Ic => {
                let provider = parse_provider(MAINNET_GATEWAY)?;
                Ok(format_frontend_url(&provider, canister_id))
            }
            ProviderNetwork::Custom { url } => {
                let provider = parse_provider(url)?;
                Ok(format_frontend_url(&provider, canister_id))
            }
        }
    }
}

fn parse_provider(provider: &str) -> Result<Url, BuildUrlError> {
    Url::parse(provider).map_err(|err| ParseProviderUrlFailed(provider.to_string(), err))
}

/// Canister subdomain for named hosts, `canisterId` query parameter for IP hosts.
pub fn format_frontend_url(provider: &Url, canister_id: &str) -> Url {
    let mut url = provider.clone();
    if let Some(Domain(domain)) = url.host() {
        let domain = if domain.ends_with("icp-api.io") || domain.ends_with("ic0.app") {
            domain.replace("icp-api.io", "icp0.io").replace("ic0.app", "icp0.io")
        } else {
            domain.to_string()
        };
        let host = format!("{}.{}", canister_id, domain);
        // a domain host prefixed with a canister id is still a valid domain
        let _ = url.set_host(Some(&host));
    } else {
        let query = format!("canisterId={}", canister_id);
        url.set_query(Some(&query));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANISTER: &str = "z5cfx-3qaaa-aaaag-aaoka-cai";

    #[test]
    fn local_network_uses_lan_address() {
        let network = ProviderNetwork::Local {
            local_ip_address: "192.168.0.210".to_string(),
        };

        assert_eq!(
            network.frontend_url(CANISTER).unwrap().as_str(),
            format!("https://192.168.0.210:14943/?canisterId={}", CANISTER)
        );
    }

    #[test]
    fn mainnet_uses_canister_subdomain() {
        assert_eq!(
            ProviderNetwork::Ic.frontend_url(CANISTER).unwrap().as_str(),
            format!("https://{}.icp0.io/", CANISTER)
        );
    }

    #[test]
    fn custom_provider_is_rewritten() {
        let legacy = ProviderNetwork::Custom {
            url: "https://ic0.app".to_string(),
        };
        let ip = ProviderNetwork::Custom {
            url: "http://127.0.0.1:4943".to_string(),
        };

        assert_eq!(
            legacy.frontend_url(CANISTER).unwrap().as_str(),
            format!("https://{}.icp0.io/", CANISTER)
        );
        assert_eq!(
            ip.frontend_url(CANISTER).unwrap().as_str(),
            format!("http://127.0.0.1:4943/?canisterId={}", CANISTER)
        );
    }

    #[test]
    fn unparseable_custom_provider_is_an_error() {
        let network = ProviderNetwork::Custom {
            url: "not a url".to_string(),
        };

        assert!(matches!(
            network.frontend_url(CANISTER),
            Err(BuildUrlError::ParseProviderUrlFailed(..))
        ));
    }

    #[test]
    fn config_form() {
        let network: ProviderNetwork =
            serde_json::from_str(r#"{"type":"local","local-ip-address":"10.0.0.2"}"#).unwrap();
        assert_eq!(
            network,
            ProviderNetwork::Local {
                local_ip_address: "10.0.0.2".to_string()
            }
        );
        let network: ProviderNetwork = serde_json::from_str(r#"{"type":"ic"}"#).unwrap();
        assert_eq!(network, ProviderNetwork::Ic);
    }
}
