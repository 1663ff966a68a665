//! Signed expiring admin session tokens.
//!
//! The back office authenticates with a username/password checked
//! server-side; successful login issues a stateless bearer token of the
//! form `aster1.<expiry-unix>.<hmac-sha256-hex>`. Every mutating
//! back-office route verifies the token before touching the store.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Token format marker and version.
const TOKEN_PREFIX: &str = "aster1";

/// How long an issued token stays valid.
const TOKEN_TTL_HOURS: i64 = 12;

/// Errors from token verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Not a token we issued (wrong shape or prefix).
    #[error("malformed token")]
    Malformed,
    /// Signature is valid but the token has expired.
    #[error("token expired")]
    Expired,
    /// Signature does not match.
    #[error("bad token signature")]
    BadSignature,
}

/// Issue a token valid for the standard TTL from `now`.
#[must_use]
pub fn issue(secret: &[u8], now: DateTime<Utc>) -> String {
    let expiry = (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp();
    let tag = hex::encode(mac_for(secret, expiry).finalize().into_bytes());
    format!("{TOKEN_PREFIX}.{expiry}.{tag}")
}

/// Verify a token against the signing secret and the current time.
///
/// # Errors
///
/// Returns the matching [`TokenError`] on any failure. The MAC comparison
/// is constant-time.
pub fn verify(secret: &[u8], token: &str, now: DateTime<Utc>) -> Result<(), TokenError> {
    let mut parts = token.split('.');
    let (prefix, expiry_raw, tag_hex) = match (parts.next(), parts.next(), parts.next(), parts.next())
    {
        (Some(prefix), Some(expiry), Some(tag), None) => (prefix, expiry, tag),
        _ => return Err(TokenError::Malformed),
    };

    if prefix != TOKEN_PREFIX {
        return Err(TokenError::Malformed);
    }

    let expiry: i64 = expiry_raw.parse().map_err(|_| TokenError::Malformed)?;
    let tag = hex::decode(tag_hex).map_err(|_| TokenError::Malformed)?;

    mac_for(secret, expiry)
        .verify_slice(&tag)
        .map_err(|_| TokenError::BadSignature)?;

    if expiry < now.timestamp() {
        return Err(TokenError::Expired);
    }

    Ok(())
}

fn mac_for(secret: &[u8], expiry: i64) -> HmacSha256 {
    // HMAC accepts keys of any length, so construction cannot fail.
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC key of any length is accepted");
    mac.update(format!("{TOKEN_PREFIX}.{expiry}").as_bytes());
    mac
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_roundtrip() {
        let now = Utc::now();
        let token = issue(SECRET, now);
        assert!(verify(SECRET, &token, now).is_ok());
        assert!(token.starts_with("aster1."));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = Utc::now();
        let token = issue(SECRET, now);
        let later = now + Duration::hours(TOKEN_TTL_HOURS + 1);
        assert_eq!(verify(SECRET, &token, later), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_expiry_is_rejected() {
        let now = Utc::now();
        let token = issue(SECRET, now);

        // push the expiry forward without re-signing
        let mut parts = token.split('.');
        let prefix = parts.next().unwrap();
        let expiry: i64 = parts.next().unwrap().parse().unwrap();
        let tag = parts.next().unwrap();
        let forged = format!("{prefix}.{}.{tag}", expiry + 3600);

        assert_eq!(verify(SECRET, &forged, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let now = Utc::now();
        let token = issue(SECRET, now);
        assert_eq!(
            verify(b"another-secret-another-secret-xx", &token, now),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let now = Utc::now();
        for garbage in ["", "aster1", "aster1.123", "nope.123.abcd", "aster1.xyz.abcd",
            "aster1.123.zz-not-hex", "aster1.1.2.3"]
        {
            assert_eq!(verify(SECRET, garbage, now), Err(TokenError::Malformed), "{garbage}");
        }
    }
}
