// Bearer token extractor for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use crate::auth::{error::AuthError, token::TokenService};
use tracing::warn;

/// Authenticated user extractor for protected routes
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
    pub roles: Vec<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let endpoint = parts.uri.path().to_string();

        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header for endpoint: {}", endpoint);
                AuthError::InvalidToken
            })?;

        // Verify Bearer token format
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header missing 'Bearer ' prefix for endpoint: {}", endpoint);
            AuthError::InvalidToken
        })?;

        let claims = TokenService::from_ref(state).validate(token)?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            username: claims.sub,
            roles: claims.roles,
        })
    }
}
