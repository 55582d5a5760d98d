// JWT token generation and validation service

use crate::auth::{error::AuthError, models::Principal};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default token lifetime: 24 hours
pub const DEFAULT_EXPIRATION_SECS: i64 = 86400;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // username
    pub user_id: i32,
    pub roles: Vec<String>,
    pub exp: i64,        // expiration timestamp
    pub iat: i64,        // issued at timestamp
}

/// Token service for JWT operations
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiration_secs: i64,
}

impl TokenService {
    /// Create a new TokenService with secret key and token lifetime in seconds
    pub fn new(secret: String, expiration_secs: i64) -> Self {
        Self {
            secret,
            expiration_secs,
        }
    }

    /// Issue a signed token for an authenticated principal
    pub fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: principal.username.clone(),
            user_id: principal.id,
            roles: principal.roles.clone(),
            iat: now,
            exp: now + self.expiration_secs,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate a token's signature and expiry and return its claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}
