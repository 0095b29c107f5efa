use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};

pub(crate) fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))?;
    Ok(decoded)
}

pub(crate) fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Serialize one cookie-jar entry. Values are base64url-encoded so they can
/// carry serialized JSON without colliding with cookie syntax.
pub(crate) fn format_cookie_line(
    name: &str,
    value: &str,
    expires_at: DateTime<Utc>,
    max_age: i64,
) -> String {
    format!(
        "{name}={}; Expires={}; Max-Age={max_age}",
        base64url_encode(value.as_bytes()),
        expires_at.to_rfc3339(),
    )
}

/// Parse a line produced by [`format_cookie_line`] back into
/// (name, decoded value, expiry).
pub(crate) fn parse_cookie_line(line: &str) -> Result<(String, String, DateTime<Utc>), UtilError> {
    let mut attrs = line.split(';').map(|s| s.trim());

    let pair = attrs
        .next()
        .ok_or_else(|| UtilError::Cookie("Empty cookie line".to_string()))?;
    let (name, encoded) = pair
        .split_once('=')
        .ok_or_else(|| UtilError::Cookie(format!("Malformed cookie pair: {pair}")))?;

    let mut expires_at = None;
    for attr in attrs {
        if let Some((key, val)) = attr.split_once('=') {
            if key.eq_ignore_ascii_case("Expires") {
                let parsed = DateTime::parse_from_rfc3339(val)
                    .map_err(|_| UtilError::Cookie(format!("Invalid cookie expiry: {val}")))?;
                expires_at = Some(parsed.with_timezone(&Utc));
            }
        }
    }
    let expires_at =
        expires_at.ok_or_else(|| UtilError::Cookie("Cookie has no Expires attribute".to_string()))?;

    let value = String::from_utf8(base64url_decode(encoded)?)
        .map_err(|_| UtilError::Format("Cookie value is not valid UTF-8".to_string()))?;

    Ok((name.to_string(), value, expires_at))
}

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub(crate) enum UtilError {
    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Invalid format: {0}")]
    Format(String),
}
