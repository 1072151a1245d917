//! Customer review service

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::Store;
use shared::{average_rating, validate_rating, validate_review_comment, Review, SubmitReviewInput};

#[derive(Clone)]
pub struct ReviewService {
    store: Store,
}

impl ReviewService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Reviews of a business in the order they were posted
    pub async fn get_business_reviews(&self, business_id: Uuid) -> AppResult<Vec<Review>> {
        self.store.repo().list_reviews(business_id).await
    }

    /// Mean rating to one decimal place; zero without reviews
    pub async fn get_average_rating(&self, business_id: Uuid) -> AppResult<Decimal> {
        let reviews = self.get_business_reviews(business_id).await?;
        Ok(average_rating(&reviews))
    }

    pub async fn submit_review(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        user_name: &str,
        input: SubmitReviewInput,
    ) -> AppResult<Review> {
        validate_rating(input.rating).map_err(|m| AppError::validation("rating", m))?;
        validate_review_comment(&input.comment).map_err(|m| AppError::validation("comment", m))?;

        if self.store.repo().get_business(business_id).await?.is_none() {
            return Err(AppError::not_found("Business"));
        }

        let review = Review {
            id: Uuid::new_v4(),
            business_id,
            user_id,
            user_name: user_name.to_string(),
            rating: input.rating,
            comment: input.comment.trim().to_string(),
            created_at: Utc::now(),
        };

        self.store.repo().insert_review(&review).await?;

        tracing::info!(
            "Review {} ({} stars) posted for business {}",
            review.id,
            review.rating,
            business_id
        );

        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_average_without_reviews_is_zero() {
        let service = ReviewService::new(Store::in_memory());
        assert_eq!(
            service.get_average_rating(Uuid::new_v4()).await.unwrap(),
            Decimal::ZERO
        );
    }

    #[tokio::test]
    async fn test_review_for_unknown_business() {
        let service = ReviewService::new(Store::in_memory());
        let input = SubmitReviewInput {
            rating: 4,
            comment: "Nice".to_string(),
        };
        assert!(matches!(
            service.submit_review(Uuid::new_v4(), Uuid::new_v4(), "Sam", input).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rating_out_of_range() {
        let service = ReviewService::new(Store::in_memory());
        for rating in [0, 6, -1] {
            let input = SubmitReviewInput {
                rating,
                comment: "Nice".to_string(),
            };
            let err = service
                .submit_review(Uuid::new_v4(), Uuid::new_v4(), "Sam", input)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation { ref field, .. } if field == "rating"));
        }
    }
}
