// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};
use crate::auth::models::Role;

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request body failed field validation
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Credential verification failed
    #[error("Bad credentials")]
    InvalidCredentials,

    #[error("Username is already taken!")]
    UsernameTaken,

    #[error("Email is already in use!")]
    EmailInUse,

    /// A role record expected in the `roles` table is missing.
    /// The table was not seeded; this is a server fault, not a client one.
    #[error("Role {0} is not found")]
    RoleNotFound(Role),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.error_message();

        let body = match &self {
            AuthError::ValidationError(errors) => {
                let details = validation_details(errors);
                let mut fields: Vec<&String> = details.keys().collect();
                fields.sort();
                debug!("Validation failed for fields: {:?}", fields);
                json!({
                    "message": message,
                    "details": details,
                })
            }
            AuthError::InvalidCredentials => {
                warn!("Authentication failed: bad credentials");
                json!({ "message": message })
            }
            AuthError::UsernameTaken | AuthError::EmailInUse => {
                warn!("Registration rejected: {}", message);
                json!({ "message": message })
            }
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::MissingToken => {
                warn!("Bearer authentication failed: {}", self);
                json!({ "message": message })
            }
            AuthError::RoleNotFound(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::DatabaseError(_) => {
                error!("Internal auth error: {}", self);
                json!({ "message": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Failed rule codes per field. Rejected values are left out, they may be passwords.
fn validation_details(errors: &validator::ValidationErrors) -> serde_json::Map<String, serde_json::Value> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let codes: Vec<&str> = field_errors.iter().map(|e| e.code.as_ref()).collect();
            (field.to_string(), json!(codes))
        })
        .collect()
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UsernameTaken => StatusCode::BAD_REQUEST,
            AuthError::EmailInUse => StatusCode::BAD_REQUEST,
            AuthError::RoleNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::PasswordHashError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a descriptive error message for this error
    /// This message is safe to send to clients (no sensitive data)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(_) => "Request validation failed".to_string(),
            AuthError::InvalidCredentials => "Bad credentials".to_string(),
            AuthError::UsernameTaken => "Username is already taken!".to_string(),
            AuthError::EmailInUse => "Email is already in use!".to_string(),
            AuthError::RoleNotFound(_) => "Error: Role is not found.".to_string(),
            AuthError::InvalidToken => "Invalid token".to_string(),
            AuthError::ExpiredToken => "Token has expired".to_string(),
            AuthError::MissingToken => "Missing authentication token".to_string(),
            AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::DatabaseError(_) => "Internal server error".to_string(),
        }
    }
}
