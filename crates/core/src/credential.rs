//! Bearer-or-cookie credential normalization.
//!
//! Browsers send the session token as a `token` cookie; API clients send an
//! `Authorization: Bearer` header. Both collapse into a single [`Credential`]
//! before any token validation happens.

/// Name of the cookie that carries the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Where the credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Header,
    Cookie,
}

/// A raw, not-yet-validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub source: CredentialSource,
}

/// Pick the credential from the request headers.
///
/// The `Authorization` header wins when it carries a non-empty bearer token.
pub fn extract_credential(
    authorization: Option<&str>,
    cookie_header: Option<&str>,
) -> Option<Credential> {
    if let Some(token) = authorization.and_then(bearer_token) {
        return Some(Credential {
            token: token.to_string(),
            source: CredentialSource::Header,
        });
    }

    cookie_header
        .and_then(|h| cookie_value(h, TOKEN_COOKIE))
        .map(|token| Credential {
            token: token.to_string(),
            source: CredentialSource::Cookie,
        })
}

fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
