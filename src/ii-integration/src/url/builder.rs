use crate::error::url::BuildUrlError;
use crate::url::deep_link::{resolve_deep_link_type, DeepLinkType};
use crate::url::provider::ProviderNetwork;
use url::Url;

pub const PUBKEY_PARAM: &str = "pubkey";
pub const DEEP_LINK_TYPE_PARAM: &str = "deep-link-type";
pub const SESSION_ID_PARAM: &str = "session-id";

pub struct IIIntegrationUrlArgs<'a> {
    /// DER-encoded application public key.
    pub public_key: &'a [u8],
    pub network: &'a ProviderNetwork,
    pub ii_integration_canister_id: &'a str,
    pub deep_link_type: Option<DeepLinkType>,
    pub deep_link: &'a str,
    pub frontend_canister_id: &'a str,
    pub auth_path: &'a str,
    pub session_id: Option<&'a str>,
}

/// Exactly one leading slash.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Builds the URL of the authentication page served by the integration canister.
///
/// Query parameters already present on the provider origin are kept, except the
/// ones set here.
pub fn build_ii_integration_url(args: &IIIntegrationUrlArgs<'_>) -> Result<Url, BuildUrlError> {
    let deep_link_type = resolve_deep_link_type(
        args.deep_link_type,
        args.deep_link,
        args.frontend_canister_id,
    )?;
    let mut url = args
        .network
        .frontend_url(args.ii_integration_canister_id)?;
    url.set_path(&normalize_path(args.auth_path));

    let mut params = vec![
        (PUBKEY_PARAM, hex::encode(args.public_key)),
        (DEEP_LINK_TYPE_PARAM, deep_link_type.to_string()),
    ];
    if let Some(session_id) = args.session_id {
        params.push((SESSION_ID_PARAM, session_id.to_string()));
    }
    set_query_params(&mut url, &params);

    Ok(url)
}

fn set_query_params(url: &mut Url, params: &[(&str, String)]) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| params.iter().all(|(param, _)| name.as_ref() != *param))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut query = url.query_pairs_mut();
    query.clear();
    query.extend_pairs(kept);
    query.extend_pairs(params.iter().map(|(name, value)| (*name, value.as_str())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const II_INTEGRATION: &str = "z5cfx-3qaaa-aaaag-aaoka-cai";
    const FRONTEND: &str = "bkyz2-fmaaa-aaaaa-qaaaq-cai";

    fn args<'a>(
        network: &'a ProviderNetwork,
        auth_path: &'a str,
        session_id: Option<&'a str>,
    ) -> IIIntegrationUrlArgs<'a> {
        IIIntegrationUrlArgs {
            public_key: &[0x30, 0x2a, 0xab],
            network,
            ii_integration_canister_id: II_INTEGRATION,
            deep_link_type: None,
            deep_link: "exp://192.168.1.1:8081",
            frontend_canister_id: FRONTEND,
            auth_path,
            session_id,
        }
    }

    #[test]
    fn local_url_keeps_canister_id_and_sets_params() {
        let network = ProviderNetwork::Local {
            local_ip_address: "192.168.1.1".to_string(),
        };

        let url = build_ii_integration_url(&args(&network, "auth", Some("abcd"))).unwrap();

        assert_eq!(
            url.as_str(),
            format!(
                "https://192.168.1.1:14943/auth?canisterId={}&pubkey=302aab&deep-link-type=expo-go&session-id=abcd",
                II_INTEGRATION
            )
        );
    }

    #[test]
    fn mainnet_url_without_session() {
        let url = build_ii_integration_url(&args(&ProviderNetwork::Ic, "/", None)).unwrap();

        assert_eq!(
            url.as_str(),
            format!(
                "https://{}.icp0.io/?pubkey=302aab&deep-link-type=expo-go",
                II_INTEGRATION
            )
        );
    }

    #[test]
    fn existing_params_are_replaced() {
        let network = ProviderNetwork::Custom {
            url: "https://example.org/?pubkey=stale&theme=dark".to_string(),
        };

        let url = build_ii_integration_url(&args(&network, "//login", None)).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        assert_eq!(url.host_str(), Some(format!("{}.example.org", II_INTEGRATION).as_str()));
        assert_eq!(url.path(), "/login");
        assert_eq!(
            pairs,
            vec![
                ("theme".to_string(), "dark".to_string()),
                ("pubkey".to_string(), "302aab".to_string()),
                ("deep-link-type".to_string(), "expo-go".to_string()),
            ]
        );
    }

    #[test]
    fn unresolved_deep_link_type_fails() {
        let network = ProviderNetwork::Ic;
        let mut args = args(&network, "/", None);
        args.deep_link = "myapp://";

        assert!(matches!(
            build_ii_integration_url(&args),
            Err(BuildUrlError::UnresolvedDeepLinkType(_))
        ));
    }

    proptest! {
        #[test]
        fn normalized_path_has_one_leading_slash(path in "/{0,3}[a-z/]{0,8}") {
            let normalized = normalize_path(&path);
            prop_assert!(normalized.starts_with('/'));
            prop_assert!(!normalized.starts_with("//"));
            prop_assert_eq!(normalize_path(&normalized), normalized.clone());
            prop_assert_eq!(normalized.trim_start_matches('/'), path.trim_start_matches('/'));
        }
    }
}
