// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Roles an account can hold, stored in the `roles` table by their `ROLE_*` name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    User,
    Employee,
    Admin,
}

/// Role names accepted in a sign-up request. Anything else maps to `Role::DEFAULT`.
const REQUESTED_ROLES: &[(&str, Role)] = &[("admin", Role::Admin), ("emp", Role::Employee)];

impl Role {
    /// Role assigned when a sign-up request names none, or names one we don't know
    pub const DEFAULT: Role = Role::User;

    pub const ALL: [Role; 3] = [Role::User, Role::Employee, Role::Admin];

    /// Persisted authority name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Employee => "ROLE_EMPLOYEE",
            Role::Admin => "ROLE_ADMIN",
        }
    }

    /// Parse a persisted authority name
    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.as_str() == name)
    }

    /// Map a role name from a sign-up request. Case-sensitive.
    pub fn from_requested(name: &str) -> Role {
        REQUESTED_ROLES
            .iter()
            .find(|(requested, _)| *requested == name)
            .map(|(_, role)| *role)
            .unwrap_or(Role::DEFAULT)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role database record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleRecord {
    pub id: i32,
    pub name: Role,
}

/// Account as loaded from the store, with its assigned roles
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub contact: String,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
}

/// Account about to be persisted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub contact: String,
    pub roles: BTreeSet<RoleRecord>,
}

/// Identity produced by a successful credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub contact: String,
    /// Granted authorities, e.g. `ROLE_ADMIN`
    pub roles: Vec<String>,
}

impl From<Account> for Principal {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            address: account.address,
            contact: account.contact,
            roles: account.roles.iter().map(|role| role.as_str().to_string()).collect(),
        }
    }
}

/// Rejects empty and whitespace-only strings
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Sign-in request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SigninRequest {
    #[validate(custom = "not_blank")]
    pub username: String,
    #[validate(custom = "not_blank")]
    pub password: String,
}

/// Sign-up request DTO. Length limits match the `users` columns.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(custom = "not_blank", length(min = 3, max = 20))]
    pub username: String,
    #[validate(email, length(max = 50))]
    pub email: String,
    /// No minimum beyond non-blank; strength policy is left to the client
    #[validate(custom = "not_blank", length(max = 40))]
    pub password: String,
    #[validate(length(max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: String,
    #[validate(length(max = 255))]
    pub address: String,
    #[validate(length(max = 50))]
    pub contact: String,
    /// Requested role names: "admin", "emp", anything else means a standard user
    #[schema(value_type = Option<Vec<String>>)]
    pub role: Option<HashSet<String>>,
}

/// Sign-in response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub id: i32,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub contact: String,
}

impl JwtResponse {
    pub fn new(token: String, principal: Principal) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            id: principal.id,
            username: principal.username,
            email: principal.email,
            roles: principal.roles,
            first_name: principal.first_name,
            last_name: principal.last_name,
            address: principal.address,
            contact: principal.contact,
        }
    }
}

/// Plain message response, used for sign-up outcomes and errors
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Principal carried by a bearer token, returned from GET /api/auth/me
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub id: i32,
    pub username: String,
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_requested_role_mapping() {
        assert_eq!(Role::from_requested("admin"), Role::Admin);
        assert_eq!(Role::from_requested("emp"), Role::Employee);
        assert_eq!(Role::from_requested("user"), Role::User);
        assert_eq!(Role::from_requested("xyz"), Role::User);
    }

    #[test]
    fn test_requested_role_mapping_is_case_sensitive() {
        assert_eq!(Role::from_requested("Admin"), Role::User);
        assert_eq!(Role::from_requested("EMP"), Role::User);
    }

    #[test]
    fn test_role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_name("ROLE_MODERATOR"), None);
    }

    #[test]
    fn test_principal_from_account_exposes_role_names() {
        let account = Account {
            id: 7,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            address: "1 Rabbit Hole".to_string(),
            contact: "555-0100".to_string(),
            roles: BTreeSet::from([Role::Admin, Role::Employee]),
            created_at: Utc::now(),
        };

        let principal = Principal::from(account);
        assert_eq!(principal.id, 7);
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.roles.len(), 2);
        assert!(principal.roles.contains(&"ROLE_ADMIN".to_string()));
        assert!(principal.roles.contains(&"ROLE_EMPLOYEE".to_string()));
    }

    #[test]
    fn test_signup_request_role_absent_or_null() {
        let absent: SignupRequest = serde_json::from_str(
            r#"{"username":"alice","email":"a@x.com","password":"secret1",
                "first_name":"A","last_name":"L","address":"x","contact":"y"}"#,
        )
        .unwrap();
        assert!(absent.role.is_none());

        let null: SignupRequest = serde_json::from_str(
            r#"{"username":"alice","email":"a@x.com","password":"secret1",
                "first_name":"A","last_name":"L","address":"x","contact":"y","role":null}"#,
        )
        .unwrap();
        assert!(null.role.is_none());
    }

    #[test]
    fn test_signup_request_validation() {
        let request = SignupRequest {
            username: "al".to_string(),
            email: "not-an-email".to_string(),
            password: "   ".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
            address: "x".to_string(),
            contact: "y".to_string(),
            role: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    fn valid_signup_request() -> SignupRequest {
        SignupRequest {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "p".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
            address: "x".to_string(),
            contact: "y".to_string(),
            role: None,
        }
    }

    #[test]
    fn test_single_character_password_is_accepted() {
        assert!(valid_signup_request().validate().is_ok());
    }

    #[test]
    fn test_profile_fields_limited_to_column_widths() {
        let mut request = valid_signup_request();
        request.first_name = "f".repeat(101);
        request.last_name = "l".repeat(101);
        request.address = "a".repeat(256);
        request.contact = "5".repeat(51);

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["first_name", "last_name", "address", "contact"] {
            assert!(fields.contains_key(field), "{} should be rejected", field);
        }

        let mut request = valid_signup_request();
        request.first_name = "f".repeat(100);
        request.last_name = "l".repeat(100);
        request.address = "a".repeat(255);
        request.contact = "5".repeat(50);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signin_request_rejects_whitespace_only_fields() {
        let request = SigninRequest {
            username: "   ".to_string(),
            password: "\t\n".to_string(),
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["username"][0].code, "blank");
        assert_eq!(fields["password"][0].code, "blank");

        let request = SigninRequest {
            username: " alice ".to_string(),
            password: "p".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_jwt_response_serializes_token_type() {
        let principal = Principal {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
            address: "x".to_string(),
            contact: "y".to_string(),
            roles: vec!["ROLE_USER".to_string()],
        };

        let value = serde_json::to_value(JwtResponse::new("t".to_string(), principal)).unwrap();
        assert_eq!(value["type"], "Bearer");
        assert_eq!(value["first_name"], "A");
        assert_eq!(value["roles"], serde_json::json!(["ROLE_USER"]));
    }

    proptest! {
        // Anything that is not exactly "admin" or "emp" resolves to a standard user
        #[test]
        fn prop_unrecognized_requested_roles_default_to_user(name in "[a-zA-Z]{0,12}") {
            prop_assume!(name != "admin" && name != "emp");
            prop_assert_eq!(Role::from_requested(&name), Role::User);
        }
    }
}
