// HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use tracing::Span;
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{CurrentUserResponse, JwtResponse, MessageResponse, SigninRequest, SignupRequest},
};
use crate::AppState;

/// Sign in with username and password
/// POST /api/auth/signin
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = JwtResponse),
        (status = 400, description = "Invalid input data", body = MessageResponse),
        (status = 401, description = "Bad credentials", body = MessageResponse, example = json!({"message": "Bad credentials"}))
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all, fields(principal = tracing::field::Empty))]
pub async fn signin_handler(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<Json<JwtResponse>, AuthError> {
    payload.validate()?;

    let response = state.auth.signin(&payload.username, &payload.password).await?;

    // The principal stays attached to this request's span until the response is sent
    Span::current().record("principal", response.username.as_str());
    Ok(Json(response))
}

/// Register a new account
/// POST /api/auth/signup
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse, example = json!({"message": "User registered successfully!"})),
        (status = 400, description = "Invalid input, or username/email already registered", body = MessageResponse, example = json!({"message": "Username is already taken!"})),
        (status = 500, description = "Role table not seeded", body = MessageResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all)]
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    payload.validate()?;

    let response = state.auth.signup(payload).await?;
    Ok(Json(response))
}

/// Get the principal carried by the bearer token
/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current principal", body = CurrentUserResponse),
        (status = 401, description = "Missing, invalid or expired token", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn me_handler(user: AuthenticatedUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        id: user.user_id,
        username: user.username,
        roles: user.roles,
    })
}
