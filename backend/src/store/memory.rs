//! In-memory repository used by tests, demos and single-node deployments

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Repository, StoredUser, WorkflowChange};
use crate::error::{AppError, AppResult};
use shared::{Business, FraudReport, Review, User, Verification, VerificationEvent};

#[derive(Default)]
struct MemoryState {
    businesses: HashMap<Uuid, Business>,
    /// Insertion order of `businesses`
    business_order: Vec<Uuid>,
    /// Current verification keyed by business id
    verifications: HashMap<Uuid, Verification>,
    verification_events: Vec<VerificationEvent>,
    reviews: Vec<Review>,
    users: HashMap<Uuid, StoredUser>,
    fraud_reports: Vec<FraudReport>,
}

/// Repository keeping every collection in process memory
#[derive(Default)]
pub struct InMemoryRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn upsert_business(state: &mut MemoryState, business: &Business) {
    if state
        .businesses
        .insert(business.id, business.clone())
        .is_none()
    {
        state.business_order.push(business.id);
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn get_business(&self, id: Uuid) -> AppResult<Option<Business>> {
        Ok(self.state.read().await.businesses.get(&id).cloned())
    }

    async fn list_businesses(&self) -> AppResult<Vec<Business>> {
        let state = self.state.read().await;
        Ok(state
            .business_order
            .iter()
            .filter_map(|id| state.businesses.get(id).cloned())
            .collect())
    }

    async fn save_business(&self, business: &Business) -> AppResult<()> {
        upsert_business(&mut *self.state.write().await, business);
        Ok(())
    }

    async fn get_verification(&self, business_id: Uuid) -> AppResult<Option<Verification>> {
        Ok(self
            .state
            .read()
            .await
            .verifications
            .get(&business_id)
            .cloned())
    }

    async fn list_verifications(&self) -> AppResult<Vec<Verification>> {
        let state = self.state.read().await;
        let mut verifications: Vec<Verification> = state.verifications.values().cloned().collect();
        verifications.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(verifications)
    }

    async fn list_verification_events(&self, business_id: Uuid) -> AppResult<Vec<VerificationEvent>> {
        Ok(self
            .state
            .read()
            .await
            .verification_events
            .iter()
            .filter(|e| e.business_id == business_id)
            .cloned()
            .collect())
    }

    async fn commit_workflow(&self, change: WorkflowChange<'_>) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(business) = change.business {
            upsert_business(&mut state, business);
        }
        if let Some(verification) = change.verification {
            state
                .verifications
                .insert(verification.business_id, verification.clone());
        }
        state.verification_events.push(change.event.clone());
        Ok(())
    }

    async fn list_reviews(&self, business_id: Uuid) -> AppResult<Vec<Review>> {
        Ok(self
            .state
            .read()
            .await
            .reviews
            .iter()
            .filter(|r| r.business_id == business_id)
            .cloned()
            .collect())
    }

    async fn insert_review(&self, review: &Review) -> AppResult<()> {
        self.state.write().await.reviews.push(review.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .get(&id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<StoredUser>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|stored| stored.user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_user(&self, user: &StoredUser) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state
            .users
            .values()
            .any(|stored| stored.user.email.eq_ignore_ascii_case(&user.user.email))
        {
            return Err(AppError::Conflict {
                resource: "email".to_string(),
                message: "An account with this email already exists".to_string(),
            });
        }
        state.users.insert(user.user.id, user.clone());
        Ok(())
    }

    async fn insert_fraud_report(&self, report: &FraudReport) -> AppResult<()> {
        self.state.write().await.fraud_reports.push(report.clone());
        Ok(())
    }

    async fn list_fraud_reports(&self, business_id: Option<Uuid>) -> AppResult<Vec<FraudReport>> {
        Ok(self
            .state
            .read()
            .await
            .fraud_reports
            .iter()
            .filter(|r| business_id.map_or(true, |id| r.business_id == id))
            .cloned()
            .collect())
    }
}
