use crate::error::url::{ParseDeepLinkTypeError, UnresolvedDeepLinkTypeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const EXPO_GO_SCHEME: &str = "exp://";
const DEV_SERVER_ORIGINS: [&str; 2] = ["http://localhost:8081", "http://127.0.0.1:8081"];

/// How the authentication page should return to the app.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeepLinkType {
    Legacy,
    Modern,
    ExpoGo,
    DevServer,
    Icp,
}

impl DeepLinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeepLinkType::Legacy => "legacy",
            DeepLinkType::Modern => "modern",
            DeepLinkType::ExpoGo => "expo-go",
            DeepLinkType::DevServer => "dev-server",
            DeepLinkType::Icp => "icp",
        }
    }
}

impl fmt::Display for DeepLinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeepLinkType {
    type Err = ParseDeepLinkTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(DeepLinkType::Legacy),
            "modern" => Ok(DeepLinkType::Modern),
            "expo-go" => Ok(DeepLinkType::ExpoGo),
            "dev-server" => Ok(DeepLinkType::DevServer),
            "icp" => Ok(DeepLinkType::Icp),
            other => Err(ParseDeepLinkTypeError(other.to_string())),
        }
    }
}

/// An explicit override always wins. Otherwise the type is inferred from the app's
/// own deep link.
pub fn resolve_deep_link_type(
    override_type: Option<DeepLinkType>,
    deep_link: &str,
    frontend_canister_id: &str,
) -> Result<DeepLinkType, UnresolvedDeepLinkTypeError> {
    if let Some(deep_link_type) = override_type {
        return Ok(deep_link_type);
    }

    if deep_link.starts_with(EXPO_GO_SCHEME) {
        Ok(DeepLinkType::ExpoGo)
    } else if DEV_SERVER_ORIGINS
        .iter()
        .any(|origin| deep_link.starts_with(origin))
    {
        Ok(DeepLinkType::DevServer)
    } else if !frontend_canister_id.is_empty() && deep_link.contains(frontend_canister_id) {
        Ok(DeepLinkType::Icp)
    } else {
        Err(UnresolvedDeepLinkTypeError {
            override_type: override_type.map(|t| t.to_string()),
            deep_link: deep_link.to_string(),
            frontend_canister_id: frontend_canister_id.to_string(),
        })
    }
}
