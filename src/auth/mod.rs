// Authentication module
// Username/password sign-in issuing JWTs, and account registration with role assignment

pub mod authenticator;
pub mod error;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use authenticator::{Authenticator, PasswordAuthenticator};
pub use error::AuthError;
pub use handlers::{me_handler, signin_handler, signup_handler};
pub use middleware::AuthenticatedUser;
pub use models::{JwtResponse, MessageResponse, Principal, Role, SigninRequest, SignupRequest};
pub use repository::{RoleRepository, RoleStore, UserRepository, UserStore};
pub use service::AuthService;
pub use token::TokenService;
