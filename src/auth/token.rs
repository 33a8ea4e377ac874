use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// Why a session token was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token must have 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("token has an empty segment")]
    EmptySegment,

    #[error("token payload is not valid base64url")]
    InvalidEncoding,

    #[error("token payload is not a JSON object")]
    InvalidPayload,

    #[error("token payload has no numeric exp claim")]
    MissingExpiry,

    #[error("token expired at {0}")]
    Expired(i64),
}

/// Claims the dashboard reads from a token. The signature is the backend's
/// business; only the shape and expiry are checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// Expiry, seconds since the epoch
    pub exp: i64,
    pub subject: Option<String>,
    pub payload: Value,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::SegmentCount(segments.len()));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TokenError::EmptySegment);
    }

    // Some issuers keep the padding, URL_SAFE_NO_PAD refuses it
    let bytes = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|_| TokenError::InvalidEncoding)?;
    let payload: Value = serde_json::from_slice(&bytes).map_err(|_| TokenError::InvalidPayload)?;
    if !payload.is_object() {
        return Err(TokenError::InvalidPayload);
    }

    let exp = payload
        .get("exp")
        .and_then(Value::as_f64)
        .ok_or(TokenError::MissingExpiry)?;
    let subject = payload
        .get("sub")
        .or_else(|| payload.get("userId"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(Claims {
        exp: exp.floor() as i64,
        subject,
        payload,
    })
}

/// Well-formed and not yet expired at `now`
pub fn check_token_at(token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    let claims = decode_claims(token)?;
    if claims.exp <= now.timestamp() {
        return Err(TokenError::Expired(claims.exp));
    }
    Ok(claims)
}

pub fn check_token(token: &str) -> Result<Claims, TokenError> {
    check_token_at(token, Utc::now())
}

pub fn is_token_valid_at(token: &str, now: DateTime<Utc>) -> bool {
    check_token_at(token, now).is_ok()
}

pub fn is_token_valid(token: &str) -> bool {
    is_token_valid_at(token, Utc::now())
}
