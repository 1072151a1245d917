//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthResponse, LoginInput, SignupRequest};
use crate::services::AuthService;
use crate::AppState;
use shared::User;

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    Ok(Json(auth_service.login(body).await?))
}

/// Signup endpoint handler
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    let session = auth_service.signup(body.input, body.role).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Browse-only guest session
pub async fn guest(State(state): State<AppState>) -> AppResult<Json<AuthResponse>> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    Ok(Json(auth_service.guest_session()?))
}

/// Profile of the signed-in user
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<User>> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    Ok(Json(auth_service.current_user(user.user_id, user.guest).await?))
}
