// In-memory stores for tests

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::auth::{
    error::AuthError,
    models::{Account, NewAccount, Role, RoleRecord},
    repository::{RoleStore, UserStore},
};

/// Account store backed by a Vec, enforcing the same unique constraints as the `users` table
#[derive(Default)]
pub struct InMemoryUserStore {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn get(&self, username: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|account| account.username == username)
            .cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.get(username).is_some())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .any(|account| account.email == email))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.get(username))
    }

    async fn save(&self, account: NewAccount) -> Result<Account, AuthError> {
        let mut accounts = self.accounts.lock().unwrap();

        if accounts.iter().any(|a| a.username == account.username) {
            return Err(AuthError::UsernameTaken);
        }
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AuthError::EmailInUse);
        }

        let saved = Account {
            id: accounts.len() as i32 + 1,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            first_name: account.first_name,
            last_name: account.last_name,
            address: account.address,
            contact: account.contact,
            roles: account.roles.iter().map(|record| record.name).collect(),
            created_at: Utc::now(),
        };
        accounts.push(saved.clone());
        Ok(saved)
    }
}

/// Role store holding a fixed set of records
pub struct InMemoryRoleStore {
    records: Vec<RoleRecord>,
}

impl InMemoryRoleStore {
    /// All three roles present, as after the seed migration
    pub fn seeded() -> Self {
        Self::with_roles(&Role::ALL)
    }

    pub fn with_roles(roles: &[Role]) -> Self {
        let records = roles
            .iter()
            .enumerate()
            .map(|(i, role)| RoleRecord {
                id: i as i32 + 1,
                name: *role,
            })
            .collect();
        Self { records }
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn find_by_name(&self, role: Role) -> Result<Option<RoleRecord>, AuthError> {
        Ok(self.records.iter().find(|record| record.name == role).copied())
    }
}
