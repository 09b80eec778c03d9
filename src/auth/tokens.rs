use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Claim set carried by both access and refresh tokens. The subject is the
/// user id; possession of a valid signature plus an unexpired timestamp is
/// the sole authorization proof (nothing is stored server-side).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token generation error: {0}")]
    TokenGeneration(String),

    #[error("token expired")]
    Expired,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("malformed token")]
    Malformed,
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies the two session token kinds. Secrets are injected at
/// construction so verification never reads process-wide state.
#[derive(Clone)]
pub struct TokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            access: SigningKeys::from_secret(&security.access_token_secret),
            refresh: SigningKeys::from_secret(&security.refresh_token_secret),
            access_ttl_secs: security.access_token_ttl_secs,
            refresh_ttl_secs: security.refresh_token_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    pub fn issue_access(&self, user_id: i64) -> Result<String, AuthError> {
        issue(&self.access.encoding, user_id, self.access_ttl_secs)
    }

    pub fn issue_refresh(&self, user_id: i64) -> Result<String, AuthError> {
        issue(&self.refresh.encoding, user_id, self.refresh_ttl_secs)
    }

    /// Verify an access token and return the subject user id.
    pub fn verify_access(&self, token: &str) -> Result<i64, AuthError> {
        verify(&self.access.decoding, token)
    }

    /// Verify a refresh token and return the subject user id.
    pub fn verify_refresh(&self, token: &str) -> Result<i64, AuthError> {
        verify(&self.refresh.decoding, token)
    }
}

fn issue(key: &EncodingKey, user_id: i64, ttl_secs: i64) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
    };

    encode(&Header::default(), &claims, key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

fn verify(key: &DecodingKey, token: &str) -> Result<i64, AuthError> {
    let data = decode::<Claims>(token, key, &Validation::default()).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims.sub)
}
