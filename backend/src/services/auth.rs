//! Authentication service for signup, login, guest sessions and tokens

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::store::{Store, StoredUser};
use shared::{SignupInput, User, UserRole};

/// Fixed identity of browse-only guest sessions
pub const GUEST_USER_ID: Uuid = Uuid::nil();

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Store,
    jwt_secret: String,
    access_token_expiry: i64,
    bcrypt_cost: u32,
}

/// Login request; the role must match the account's role
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Signup request
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(flatten)]
    pub input: SignupInput,
    pub role: UserRole,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub role: UserRole,
    pub name: String,
    /// Guest sessions may browse but never write
    #[serde(default)]
    pub guest: bool,
    pub exp: i64,
    pub iat: i64,
}

/// Token issued on login, signup or guest entry
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

impl AuthService {
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            bcrypt_cost: config.password.bcrypt_cost,
        }
    }

    /// Authenticate with email, password and the role the user signs in as
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let stored = self
            .store
            .repo()
            .find_user_by_email(input.email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if stored.user.role != input.role {
            tracing::debug!(
                "Login as {} refused for {} account {}",
                input.role.as_str(),
                stored.user.role.as_str(),
                stored.user.id
            );
            return Err(AppError::InvalidCredentials);
        }

        let valid = verify(&input.password, &stored.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("User {} logged in as {}", stored.user.id, stored.user.role.as_str());
        self.issue(stored.user, false)
    }

    /// Create a customer or business account
    pub async fn signup(&self, input: SignupInput, role: UserRole) -> AppResult<AuthResponse> {
        if role == UserRole::Admin {
            return Err(AppError::InsufficientPermissions);
        }
        input.validate()?;

        let password_hash = hash(&input.password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: Uuid::new_v4(),
            email: input.email.trim().to_lowercase(),
            name: input.name.trim().to_string(),
            role,
            avatar: input.avatar,
            created_at: Utc::now(),
        };

        self.store
            .repo()
            .insert_user(&StoredUser {
                user: user.clone(),
                password_hash,
            })
            .await?;

        tracing::info!("New {} account {}", role.as_str(), user.id);
        self.issue(user, false)
    }

    /// Read-only customer session for browsing without an account
    pub fn guest_session(&self) -> AppResult<AuthResponse> {
        self.issue(guest_user(), true)
    }

    /// Profile behind a token subject
    pub async fn current_user(&self, user_id: Uuid, guest: bool) -> AppResult<User> {
        if guest {
            return Ok(guest_user());
        }
        self.store
            .repo()
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode_claims(token, &self.jwt_secret)
    }

    fn issue(&self, user: User, guest: bool) -> AppResult<AuthResponse> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            name: user.name.clone(),
            guest,
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            user,
        })
    }
}

/// Decode and validate an HS256 access token
pub fn decode_claims(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

fn guest_user() -> User {
    User {
        id: GUEST_USER_ID,
        email: "guest@authentify.local".to_string(),
        name: "Guest User".to_string(),
        role: UserRole::Customer,
        avatar: None,
        created_at: Utc::now(),
    }
}
