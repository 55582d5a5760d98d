pub mod auth;
pub mod config;
pub mod db;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    models::{CurrentUserResponse, JwtResponse, MessageResponse, SigninRequest, SignupRequest},
    AuthService, PasswordAuthenticator, RoleRepository, TokenService, UserRepository,
};
use db::DbPool;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::signin_handler,
        auth::handlers::signup_handler,
        auth::handlers::me_handler,
    ),
    components(
        schemas(SigninRequest, SignupRequest, JwtResponse, MessageResponse, CurrentUserResponse)
    ),
    tags(
        (name = "auth", description = "Sign-in and registration endpoints")
    ),
    info(
        title = "RevTech Auth API",
        version = "0.1.0",
        description = "Username/password sign-in with JWT issuance and account registration"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tokens: TokenService,
}

impl AppState {
    /// Wire the PostgreSQL-backed stores into the auth service
    pub fn from_pool(pool: DbPool, tokens: TokenService) -> Self {
        let users = Arc::new(UserRepository::new(pool.clone()));
        let roles = Arc::new(RoleRepository::new(pool));
        let authenticator = Arc::new(PasswordAuthenticator::new(users.clone()));

        Self {
            auth: AuthService::new(users, roles, authenticator, tokens.clone()),
            tokens,
        }
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Creates and configures the application router
/// Maps the auth endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState) -> Router {
    // Any origin may call the API; browsers may cache preflight results for an hour
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .route("/api/auth/signin", post(auth::signin_handler))
        .route("/api/auth/signup", post(auth::signup_handler))
        .route("/api/auth/me", get(auth::me_handler))
        .layer(cors)
        .with_state(state)
}
