// Authentication service - business logic layer

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::{
    authenticator::Authenticator,
    error::AuthError,
    models::{JwtResponse, MessageResponse, NewAccount, Role, RoleRecord, SignupRequest},
    password::PasswordService,
    repository::{RoleStore, UserStore},
    token::TokenService,
};

/// Authentication service coordinating sign-in and sign-up
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    authenticator: Arc<dyn Authenticator>,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        authenticator: Arc<dyn Authenticator>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            roles,
            authenticator,
            tokens,
        }
    }

    /// Verify credentials and issue a token for the resulting principal
    pub async fn signin(&self, username: &str, password: &str) -> Result<JwtResponse, AuthError> {
        let principal = self.authenticator.authenticate(username, password).await?;
        let token = self.tokens.issue(&principal)?;

        info!("User {} signed in", principal.id);
        Ok(JwtResponse::new(token, principal))
    }

    /// Register a new account
    ///
    /// This method:
    /// 1. Rejects a taken username, then a taken email
    /// 2. Hashes the password
    /// 3. Resolves the requested role names to role records
    /// 4. Saves the account with its roles
    pub async fn signup(&self, request: SignupRequest) -> Result<MessageResponse, AuthError> {
        // 1. Uniqueness, username first
        if self.users.exists_by_username(&request.username).await? {
            warn!("Sign-up with taken username: {}", request.username);
            return Err(AuthError::UsernameTaken);
        }
        if self.users.exists_by_email(&request.email).await? {
            warn!("Sign-up with email already in use");
            return Err(AuthError::EmailInUse);
        }

        // 2. Hash password
        let password_hash = PasswordService::hash_password(&request.password)?;

        // 3. Resolve roles
        let roles = self.resolve_roles(request.role.as_ref()).await?;

        // 4. Persist
        let account = self
            .users
            .save(NewAccount {
                username: request.username,
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                address: request.address,
                contact: request.contact,
                roles,
            })
            .await?;

        info!("Registered user {} ({})", account.id, account.username);
        Ok(MessageResponse::new("User registered successfully!"))
    }

    /// Map requested role names to persisted role records.
    ///
    /// No names (absent or empty) means the default role. Names collapse to a set,
    /// so `{"foo", "bar"}` yields a single standard-user role.
    pub async fn resolve_roles(
        &self,
        requested: Option<&HashSet<String>>,
    ) -> Result<BTreeSet<RoleRecord>, AuthError> {
        let wanted: BTreeSet<Role> = match requested {
            Some(names) if !names.is_empty() => {
                names.iter().map(|name| Role::from_requested(name)).collect()
            }
            _ => BTreeSet::from([Role::DEFAULT]),
        };
        debug!("Resolving roles {:?}", wanted);

        let mut records = BTreeSet::new();
        for role in wanted {
            let record = self
                .roles
                .find_by_name(role)
                .await?
                .ok_or(AuthError::RoleNotFound(role))?;
            records.insert(record);
        }

        Ok(records)
    }
}
