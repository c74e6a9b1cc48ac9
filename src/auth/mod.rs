use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::schema::user::Role;

pub mod password;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: Uuid, username: String, role: Role) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self { sub, username, role, exp, iat: now.timestamp() }
    }

    /// Whether the token's expiry has passed. Decoding does not enforce this;
    /// callers decide how to surface it.
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("token generation error: {0}")]
    TokenGeneration(String),
    #[error("JWT secret not configured")]
    SecretMissing,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed or tampered token")]
    Malformed,
    #[error("JWT secret not configured")]
    SecretMissing,
}

pub fn issue_token(claims: &Claims) -> Result<String, IssueError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(IssueError::SecretMissing);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| IssueError::TokenGeneration(e.to_string()))
}

/// Verify signature and structure and return the claims. Expiry is NOT
/// enforced here: an expired-but-authentic token decodes fine, so the caller
/// can distinguish "session expired" from "invalid session".
pub fn decode_token(token: &str) -> Result<Claims, DecodeError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(DecodeError::SecretMissing);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = false;

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|_| DecodeError::Malformed)?;

    Ok(token_data.claims)
}
