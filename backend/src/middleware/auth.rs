//! Authentication middleware
//!
//! JWT authentication and role-based access control

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::auth::decode_claims;
use crate::AppState;
use shared::UserRole;

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
    pub name: String,
    pub guest: bool,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Fail unless the user signed in with one of `roles`
    pub fn require_role(&self, roles: &[UserRole]) -> AppResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::InsufficientPermissions)
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        self.require_role(&[UserRole::Admin])
    }

    /// Guests may browse but not create anything
    pub fn require_account(&self) -> AppResult<()> {
        if self.guest {
            Err(AppError::Unauthorized(
                "Sign in to perform this action".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Authentication middleware that validates the bearer token and stores the
/// [`AuthUser`] in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token.trim(),
        None => {
            return AppError::Unauthorized("Missing or invalid Authorization header".to_string())
                .into_response();
        }
    };

    let claims = match decode_claims(token, &state.config.jwt.secret) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            return AppError::Unauthorized("Invalid user ID in token".to_string()).into_response()
        }
    };

    request.extensions_mut().insert(AuthUser {
        user_id,
        role: claims.role,
        name: claims.name,
        guest: claims.guest,
    });

    next.run(request).await
}

/// Extractor for authenticated user
/// Use this in handlers behind [`auth_middleware`]
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
