//! Review HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ReviewService;
use crate::AppState;
use shared::{average_rating, Review, SubmitReviewInput};

#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub business_id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_rating: Decimal,
    pub total_reviews: usize,
}

impl RatingSummary {
    /// Average and count taken from the same list of reviews
    pub fn from_reviews(business_id: Uuid, reviews: &[Review]) -> Self {
        Self {
            business_id,
            average_rating: average_rating(reviews),
            total_reviews: reviews.len(),
        }
    }
}

/// Reviews of a business in posting order
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> AppResult<Json<Vec<Review>>> {
    let reviews = ReviewService::new(state.store.clone())
        .get_business_reviews(business_id)
        .await?;
    Ok(Json(reviews))
}

/// Average rating of a business
pub async fn get_rating(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> AppResult<Json<RatingSummary>> {
    let reviews = ReviewService::new(state.store.clone())
        .get_business_reviews(business_id)
        .await?;

    Ok(Json(RatingSummary::from_reviews(business_id, &reviews)))
}

/// Post a review as the signed-in user
pub async fn submit_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(business_id): Path<Uuid>,
    Json(input): Json<SubmitReviewInput>,
) -> AppResult<(StatusCode, Json<Review>)> {
    user.require_account()?;
    let review = ReviewService::new(state.store.clone())
        .submit_review(business_id, user.user_id, &user.name, input)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}
