// Credential verification

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::auth::{
    error::AuthError,
    models::Principal,
    password::PasswordService,
    repository::UserStore,
};

/// Verifies a username/password pair and produces the authenticated principal
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError>;
}

/// Checks the password against the Argon2 hash stored for the account
pub struct PasswordAuthenticator {
    users: Arc<dyn UserStore>,
}

impl PasswordAuthenticator {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        // Unknown user and wrong password look the same to the caller
        let account = match self.users.find_by_username(username).await? {
            Some(account) => account,
            None => {
                debug!("No account for username {}", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !PasswordService::verify_password(password, &account.password_hash)? {
            debug!("Password mismatch for username {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Principal::from(account))
    }
}
