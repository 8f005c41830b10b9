use crate::url::builder::{normalize_path, SESSION_ID_PARAM};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use url::Url;

const DELEGATION_PARAM: &str = "delegation";

/// What ties a callback URL to the login that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackBinding<'a> {
    /// The fragment must carry this session id.
    SessionId(&'a str),
    /// The URL path must equal this auth path.
    AuthPath(&'a str),
    Unbound,
}

/// Config-level choice of [`CallbackBinding`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallbackBindingKind {
    #[default]
    SessionId,
    AuthPath,
}

/// Extracts the `delegation` value from the fragment of a callback URL.
///
/// Anything unexpected (no fragment, foreign session, wrong path, broken encoding)
/// yields `None`.
pub fn parse_delegation_from_url(url: &str, binding: &CallbackBinding<'_>) -> Option<String> {
    let url = Url::parse(url).ok()?;
    if let CallbackBinding::AuthPath(auth_path) = binding {
        if url.path() != normalize_path(auth_path) {
            return None;
        }
    }

    let fragment = url.fragment().filter(|fragment| !fragment.is_empty())?;
    if has_malformed_escape(fragment) {
        return None;
    }

    let mut delegation = None;
    let mut session_id = None;
    for (name, value) in form_urlencoded::parse(fragment.as_bytes()) {
        match name.as_ref() {
            DELEGATION_PARAM if delegation.is_none() => delegation = Some(value.into_owned()),
            SESSION_ID_PARAM if session_id.is_none() => session_id = Some(value.into_owned()),
            _ => {}
        }
    }

    if let CallbackBinding::SessionId(expected) = binding {
        if session_id.as_deref() != Some(*expected) {
            return None;
        }
    }
    delegation.filter(|delegation| !delegation.is_empty())
}

fn has_malformed_escape(encoded: &str) -> bool {
    let bytes = encoded.as_bytes();
    bytes.iter().enumerate().any(|(i, byte)| {
        *byte == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}
