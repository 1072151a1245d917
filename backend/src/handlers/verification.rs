//! Verification workflow HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, CurrentUser};
use crate::services::{BusinessService, VerificationService};
use crate::AppState;
use shared::{
    Business, ChecklistUpdate, SubmitVerificationInput, UserRole, Verification,
    VerificationEvent, VerificationFilter,
};

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub score: i32,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerificationListQuery {
    #[serde(default)]
    pub filter: VerificationFilter,
}

/// Admins may act on any business, owners only on their own
async fn ensure_owner_or_admin(state: &AppState, user: &AuthUser, business_id: Uuid) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    user.require_role(&[UserRole::Business])?;

    let business = BusinessService::new(state.store.clone(), state.geocoder.clone())
        .require_business(business_id)
        .await?;
    if business.owner_id != user.user_id {
        return Err(AppError::InsufficientPermissions);
    }
    Ok(())
}

/// Current verification of a business (public)
pub async fn get_verification(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> AppResult<Json<Verification>> {
    VerificationService::new(state.store.clone())
        .get_verification(business_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Verification"))
}

/// Submit (or resubmit) a verification request
pub async fn submit_verification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(business_id): Path<Uuid>,
    Json(input): Json<SubmitVerificationInput>,
) -> AppResult<(StatusCode, Json<Verification>)> {
    user.require_account()?;
    ensure_owner_or_admin(&state, &user, business_id).await?;

    let verification = VerificationService::new(state.store.clone())
        .submit_verification(business_id, user.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(verification)))
}

/// Move a verification to its next stage
pub async fn advance_stage(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(business_id): Path<Uuid>,
) -> AppResult<Json<Verification>> {
    user.require_admin()?;
    let verification = VerificationService::new(state.store.clone())
        .advance_stage(business_id, user.user_id)
        .await?;
    Ok(Json(verification))
}

/// Update checklist items
pub async fn update_checklist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(business_id): Path<Uuid>,
    Json(update): Json<ChecklistUpdate>,
) -> AppResult<Json<Verification>> {
    user.require_admin()?;
    let verification = VerificationService::new(state.store.clone())
        .update_checklist(business_id, user.user_id, update)
        .await?;
    Ok(Json(verification))
}

/// Approve a business with a credibility score
pub async fn approve_business(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(business_id): Path<Uuid>,
    Json(body): Json<ApproveRequest>,
) -> AppResult<Json<Business>> {
    user.require_admin()?;
    let business = VerificationService::new(state.store.clone())
        .approve_business(business_id, user.user_id, body.score)
        .await?;
    Ok(Json(business))
}

/// Reject a business
pub async fn reject_business(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(business_id): Path<Uuid>,
    Json(body): Json<RejectRequest>,
) -> AppResult<Json<Business>> {
    user.require_admin()?;
    let business = VerificationService::new(state.store.clone())
        .reject_business(business_id, user.user_id, &body.reason)
        .await?;
    Ok(Json(business))
}

/// Workflow history of a business
pub async fn verification_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(business_id): Path<Uuid>,
) -> AppResult<Json<Vec<VerificationEvent>>> {
    ensure_owner_or_admin(&state, &user, business_id).await?;
    let events = VerificationService::new(state.store.clone())
        .history(business_id)
        .await?;
    Ok(Json(events))
}

/// Admin console listing
pub async fn list_verifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<VerificationListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    user.require_admin()?;
    let verifications = VerificationService::new(state.store.clone())
        .list_verifications(query.filter)
        .await?;
    Ok(Json(serde_json::json!({
        "filter": query.filter,
        "verifications": verifications,
    })))
}
