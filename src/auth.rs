//! Request authentication and webhook signing primitives.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac as _};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq as _;

use crate::Result;
use crate::error::{Error, Kind};

type HmacSha256 = Hmac<Sha256>;

/// Headers attached to every gateway request: HTTP basic auth and a JSON content type.
pub(crate) fn default_headers(
    client_id: &str,
    client_secret: &SecretString,
) -> Result<HeaderMap> {
    let credentials = STANDARD.encode(format!("{client_id}:{}", client_secret.expose_secret()));
    let mut authorization = HeaderValue::from_str(&format!("Basic {credentials}"))?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

/// Computes the lowercase hex HMAC-SHA256 of `message` keyed by `secret`.
///
/// This is the value the gateway sends as a webhook signature, where `message` is
/// [`SignaturePayload::canonical_message`](crate::types::SignaturePayload::canonical_message).
pub fn sign(secret: &str, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::new(Kind::Unknown, format!("invalid signing key: {e}")))?;
    mac.update(message.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Exact, case-sensitive, constant-time comparison of two signature strings.
pub(crate) fn signatures_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
