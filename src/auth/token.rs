//! Token issuance and verification
//!
//! Uses HMAC-signed tokens stored in cookies.
//! No server-side session storage needed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims carried by a signed token
///
/// Self-contained: validity is decided by signature and expiry alone,
/// so a token cannot be invalidated before it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User identifier (ULID)
    pub id: String,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    /// Build claims for a user with the given validity window
    pub fn new(id: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Issue a signed token for a user
///
/// # Arguments
/// * `user_id` - Identifier to embed in the claims
/// * `secret` - HMAC secret key
/// * `ttl_seconds` - Validity window from now
pub fn issue_token(user_id: &str, secret: &str, ttl_seconds: i64) -> Result<String, AppError> {
    encode_token(
        &TokenClaims::new(user_id, Duration::seconds(ttl_seconds)),
        secret,
    )
}

/// Encode and sign claims
///
/// Token format: base64(payload).base64(hmac_sha256(payload))
///
/// Deterministic given identical claims; distinct across calls to
/// [`issue_token`] only via the timestamps.
pub fn encode_token(claims: &TokenClaims, secret: &str) -> Result<String, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // 1. Serialize claims to JSON
    let payload = serde_json::to_string(claims).map_err(|e| AppError::Internal(e.into()))?;

    // 2. Base64 encode the payload
    let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

    // 3. Create HMAC-SHA256 signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC key rejected: {e}")))?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();
    let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

    // 4. Return "{payload}.{signature}"
    Ok(format!("{}.{}", payload_b64, signature_b64))
}

/// Verify and decode a token
///
/// Checks signature validity, then that the current time is before the
/// encoded expiry. Malformed, tampered, and expired tokens all produce
/// the same undifferentiated [`AppError::Unauthorized`]; callers cannot
/// tell the cases apart.
pub fn verify_token(token: &str, secret: &str) -> Result<TokenClaims, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // 1. Split token into payload and signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err(AppError::Unauthorized);
    }

    let payload_b64 = parts[0];
    let signature_b64 = parts[1];

    // 2. Verify HMAC signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC key rejected: {e}")))?;
    mac.update(payload_b64.as_bytes());

    let expected_signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AppError::Unauthorized)?;

    mac.verify_slice(&expected_signature)
        .map_err(|_| AppError::Unauthorized)?;

    // 3. Decode and deserialize payload
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| AppError::Unauthorized)?;

    let payload_str = String::from_utf8(payload_bytes).map_err(|_| AppError::Unauthorized)?;

    let claims: TokenClaims =
        serde_json::from_str(&payload_str).map_err(|_| AppError::Unauthorized)?;

    // 4. Check expiry
    if claims.is_expired() {
        return Err(AppError::Unauthorized);
    }

    Ok(claims)
}
