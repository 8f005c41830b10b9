use thiserror::Error;

#[derive(Error, Debug)]
#[error(
    "Could not determine deep link type: deep-link-type = {override_type:?}, deep-link = '{deep_link}', frontend-canister-id = '{frontend_canister_id}'"
)]
pub struct UnresolvedDeepLinkTypeError {
    pub override_type: Option<String>,
    pub deep_link: String,
    pub frontend_canister_id: String,
}

#[derive(Error, Debug)]
#[error("Unknown deep link type '{0}'")]
pub struct ParseDeepLinkTypeError(pub String);

#[derive(Error, Debug)]
pub enum BuildUrlError {
    #[error("Failed to parse provider url '{0}'")]
    ParseProviderUrlFailed(String, #[source] url::ParseError),

    #[error(transparent)]
    UnresolvedDeepLinkType(#[from] UnresolvedDeepLinkTypeError),
}
