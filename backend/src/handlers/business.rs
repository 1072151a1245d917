//! Business directory HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::business::DirectoryQuery;
use crate::services::BusinessService;
use crate::AppState;
use shared::{Business, PaginatedResponse, RegisterBusinessInput, UserRole};

const DEFAULT_TOP_LIMIT: usize = 3;
const MAX_TOP_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

fn business_service(state: &AppState) -> BusinessService {
    BusinessService::new(state.store.clone(), state.geocoder.clone())
}

/// Search verified businesses
pub async fn list_verified_businesses(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> AppResult<Json<PaginatedResponse<Business>>> {
    Ok(Json(business_service(&state).list_verified(&query).await?))
}

/// Categories that have at least one verified business
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let categories = business_service(&state).categories().await?;
    Ok(Json(serde_json::json!({ "categories": categories })))
}

/// Highest-scoring verified businesses
pub async fn top_verified_businesses(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT).min(MAX_TOP_LIMIT);
    let businesses = business_service(&state).top_verified(limit).await?;
    Ok(Json(serde_json::json!({ "businesses": businesses })))
}

/// Get a business by id
pub async fn get_business(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> AppResult<Json<Business>> {
    Ok(Json(business_service(&state).require_business(business_id).await?))
}

/// List a new business for the signed-in owner
pub async fn register_business(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<RegisterBusinessInput>,
) -> AppResult<(StatusCode, Json<Business>)> {
    user.require_account()?;
    user.require_role(&[UserRole::Business])?;

    let business = business_service(&state)
        .register_business(user.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(business)))
}

/// Businesses owned by the signed-in user
pub async fn list_my_businesses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<serde_json::Value>> {
    user.require_role(&[UserRole::Business])?;
    let businesses = business_service(&state).list_owned(user.user_id).await?;
    Ok(Json(serde_json::json!({ "businesses": businesses })))
}
