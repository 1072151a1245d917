//! Customer review models and rating aggregation

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer review of a business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    /// 1-5 stars
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Input for posting a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReviewInput {
    pub rating: i32,
    pub comment: String,
}

/// Mean rating rounded to one decimal place, `0` when there are no reviews
pub fn average_rating<'a, I>(reviews: I) -> Decimal
where
    I: IntoIterator<Item = &'a Review>,
{
    average_of(reviews.into_iter().map(|r| r.rating))
}

/// Mean of raw ratings rounded to one decimal place (half away from zero)
pub fn average_of<I>(ratings: I) -> Decimal
where
    I: IntoIterator<Item = i32>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0i64), |(sum, count), r| (sum + r as i64, count + 1));

    if count == 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(sum) / Decimal::from(count))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
