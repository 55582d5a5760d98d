// Account and role stores

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::auth::{
    error::AuthError,
    models::{Account, NewAccount, Role, RoleRecord},
};

/// Unique constraint names from the `users` table migration
const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Read/write access to accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AuthError>;

    /// Persist an account together with its role associations, all or nothing.
    /// A uniqueness violation surfaces as `UsernameTaken` or `EmailInUse`.
    async fn save(&self, account: NewAccount) -> Result<Account, AuthError>;
}

/// Read access to the seeded role records
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn find_by_name(&self, role: Role) -> Result<Option<RoleRecord>, AuthError>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    address: String,
    contact: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_account(self, roles: BTreeSet<Role>) -> Account {
        Account {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            contact: self.contact,
            roles,
            created_at: self.created_at,
        }
    }
}

/// Map a failed insert into `users` to a business-rule rejection where it is one
fn map_insert_error(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(USERNAME_UNIQUE_CONSTRAINT) => return AuthError::UsernameTaken,
                Some(EMAIL_UNIQUE_CONSTRAINT) => return AuthError::EmailInUse,
                _ => {}
            }
        }
    }
    AuthError::DatabaseError(e)
}

/// PostgreSQL-backed account store
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn roles_for(&self, user_id: i32) -> Result<BTreeSet<Role>, AuthError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT r.name FROM roles r JOIN user_roles ur ON ur.role_id = r.id WHERE ur.user_id = $1"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names
            .into_iter()
            .filter_map(|name| {
                let role = Role::from_name(&name);
                if role.is_none() {
                    warn!("Ignoring unknown role '{}' assigned to user {}", name, user_id);
                }
                role
            })
            .collect())
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)"
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name, address, contact, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let roles = self.roles_for(row.id).await?;
                Ok(Some(row.into_account(roles)))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, account: NewAccount) -> Result<Account, AuthError> {
        // The user row and its role links commit together or not at all
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, address, contact)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, password_hash, first_name, last_name, address, contact, created_at
            "#,
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.address)
        .bind(&account.contact)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        for role in &account.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(row.id)
                .bind(role.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!("Saved user {} with {} role(s)", row.id, account.roles.len());
        let roles = account.roles.iter().map(|record| record.name).collect();
        Ok(row.into_account(roles))
    }
}

/// PostgreSQL-backed role store
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new RoleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn find_by_name(&self, role: Role) -> Result<Option<RoleRecord>, AuthError> {
        let id: Option<i32> = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(id.map(|id| RoleRecord { id, name: role }))
    }
}
