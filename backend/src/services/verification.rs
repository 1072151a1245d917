//! Verification workflow service
//!
//! Every mutation checks the business exists, takes its lock, reads the
//! current records, applies one transition and commits the changed records
//! together with a [`VerificationEvent`]. Lookups never take the lock.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{BusinessGuard, Store, WorkflowChange};
use shared::{
    validate_credibility_score, validate_rejection_reason, Business, BusinessStatus,
    ChecklistUpdate, SubmitVerificationInput, Verification, VerificationEvent,
    VerificationEventKind, VerificationFilter,
};

/// Verification workflow service
#[derive(Clone)]
pub struct VerificationService {
    store: Store,
}

impl VerificationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Current verification of a business; `None` when nothing was submitted
    pub async fn get_verification(&self, business_id: Uuid) -> AppResult<Option<Verification>> {
        self.store.repo().get_verification(business_id).await
    }

    /// Start (or restart) verification of a business.
    ///
    /// The previous verification is replaced; its history stays in the event
    /// log. An unverified or rejected business moves to pending.
    pub async fn submit_verification(
        &self,
        business_id: Uuid,
        actor_id: Uuid,
        input: SubmitVerificationInput,
    ) -> AppResult<Verification> {
        let _guard = self.lock_existing(business_id).await?;
        let repo = self.store.repo();

        let mut business = self.load_business(business_id).await?;
        let now = Utc::now();
        let verification = Verification::submitted(business_id, &input, now);

        let status_changed = matches!(
            business.status,
            BusinessStatus::Unverified | BusinessStatus::Rejected
        );
        if status_changed {
            business.status = BusinessStatus::Pending;
            business.updated_at = now;
        }

        let event = VerificationEvent::record(
            VerificationEventKind::Submitted,
            business_id,
            Some(&verification),
            Some(actor_id),
            input.notes.clone(),
            now,
        );

        repo.commit_workflow(WorkflowChange {
            business: status_changed.then_some(&business),
            verification: Some(&verification),
            event: &event,
        })
        .await?;

        tracing::info!(
            "Verification {} submitted for business {} ({} of 5 checks supplied)",
            verification.id,
            business_id,
            verification.checklist_count()
        );

        Ok(verification)
    }

    /// Move the verification to its next stage below final approval
    pub async fn advance_stage(&self, business_id: Uuid, actor_id: Uuid) -> AppResult<Verification> {
        let _guard = self.lock_existing(business_id).await?;

        let mut verification = self.load_verification(business_id).await?;
        let now = Utc::now();
        let stage = verification.advance(now)?;

        let event = VerificationEvent::record(
            VerificationEventKind::StageAdvanced,
            business_id,
            Some(&verification),
            Some(actor_id),
            None,
            now,
        );

        self.store
            .repo()
            .commit_workflow(WorkflowChange {
                business: None,
                verification: Some(&verification),
                event: &event,
            })
            .await?;

        tracing::info!(
            "Business {} verification advanced to {} ({}%)",
            business_id,
            stage,
            verification.progress
        );

        Ok(verification)
    }

    /// Tick or clear checklist items
    pub async fn update_checklist(
        &self,
        business_id: Uuid,
        actor_id: Uuid,
        update: ChecklistUpdate,
    ) -> AppResult<Verification> {
        let _guard = self.lock_existing(business_id).await?;

        let mut verification = self.load_verification(business_id).await?;
        let now = Utc::now();
        verification.apply_checklist(&update, actor_id, now);

        let event = VerificationEvent::record(
            VerificationEventKind::ChecklistUpdated,
            business_id,
            Some(&verification),
            Some(actor_id),
            update.notes.clone(),
            now,
        );

        self.store
            .repo()
            .commit_workflow(WorkflowChange {
                business: None,
                verification: Some(&verification),
                event: &event,
            })
            .await?;

        tracing::debug!(
            "Business {} checklist now {}/5",
            business_id,
            verification.checklist_count()
        );

        Ok(verification)
    }

    /// Mark a business verified with the given credibility score.
    ///
    /// The current verification, if any, is forced to final approval. Approval
    /// does not require the checklist to be complete.
    pub async fn approve_business(&self, business_id: Uuid, actor_id: Uuid, score: i32) -> AppResult<Business> {
        validate_credibility_score(score).map_err(|m| AppError::validation("score", m))?;

        let _guard = self.lock_existing(business_id).await?;
        let repo = self.store.repo();

        let mut business = self.load_business(business_id).await?;
        let mut verification = repo.get_verification(business_id).await?;
        let now = Utc::now();

        business.credibility_score = score;
        business.status = BusinessStatus::Verified;
        business.verified_badge = true;
        business.updated_at = now;

        if let Some(v) = verification.as_mut() {
            v.mark_approved(now);
        }

        let event = VerificationEvent::record(
            VerificationEventKind::Approved,
            business_id,
            verification.as_ref(),
            Some(actor_id),
            Some(format!("Credibility score {}", score)),
            now,
        );

        repo.commit_workflow(WorkflowChange {
            business: Some(&business),
            verification: verification.as_ref(),
            event: &event,
        })
        .await?;

        tracing::info!("Business {} approved with score {}", business_id, score);

        Ok(business)
    }

    /// Reject a business. The credibility score and verification stage are
    /// left as they were; the badge is withdrawn.
    pub async fn reject_business(&self, business_id: Uuid, actor_id: Uuid, reason: &str) -> AppResult<Business> {
        let reason = reason.trim();
        validate_rejection_reason(reason).map_err(|m| AppError::validation("reason", m))?;

        let _guard = self.lock_existing(business_id).await?;
        let repo = self.store.repo();

        let mut business = self.load_business(business_id).await?;
        let mut verification = repo.get_verification(business_id).await?;
        let now = Utc::now();

        business.status = BusinessStatus::Rejected;
        business.verified_badge = false;
        business.updated_at = now;

        if let Some(v) = verification.as_mut() {
            v.notes = Some(reason.to_string());
            v.verifier_id = Some(actor_id);
            v.updated_at = now;
        }

        let event = VerificationEvent::record(
            VerificationEventKind::Rejected,
            business_id,
            verification.as_ref(),
            Some(actor_id),
            Some(reason.to_string()),
            now,
        );

        repo.commit_workflow(WorkflowChange {
            business: Some(&business),
            verification: verification.as_ref(),
            event: &event,
        })
        .await?;

        tracing::info!("Business {} rejected: {}", business_id, reason);

        Ok(business)
    }

    /// Verifications for the admin console, most recently updated first
    pub async fn list_verifications(&self, filter: VerificationFilter) -> AppResult<Vec<Verification>> {
        let verifications = self.store.repo().list_verifications().await?;
        Ok(verifications
            .into_iter()
            .filter(|v| filter.matches(v))
            .collect())
    }

    /// Workflow events of a business in the order they happened
    pub async fn history(&self, business_id: Uuid) -> AppResult<Vec<VerificationEvent>> {
        self.load_business(business_id).await?;
        self.store.repo().list_verification_events(business_id).await
    }

    /// Take the write lock of a business that exists
    async fn lock_existing(&self, business_id: Uuid) -> AppResult<BusinessGuard> {
        self.load_business(business_id).await?;
        Ok(self.store.lock_business(business_id).await)
    }

    async fn load_business(&self, business_id: Uuid) -> AppResult<Business> {
        self.store
            .repo()
            .get_business(business_id)
            .await?
            .ok_or_else(|| AppError::not_found("Business"))
    }

    async fn load_verification(&self, business_id: Uuid) -> AppResult<Verification> {
        self.store
            .repo()
            .get_verification(business_id)
            .await?
            .ok_or_else(|| AppError::not_found("Verification"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{VerificationStage, VerificationType};

    async fn store_with_business() -> (Store, Uuid) {
        let store = Store::in_memory();
        let now = Utc::now();
        let business = Business {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Corner Shop".to_string(),
            category: "Retail".to_string(),
            phone: "+15550100".to_string(),
            website: None,
            address: "1 Market St".to_string(),
            location: None,
            logo: None,
            description: None,
            documents: vec![],
            credibility_score: 0,
            status: BusinessStatus::Unverified,
            verified_badge: false,
            created_at: now,
            updated_at: now,
        };
        store.repo().save_business(&business).await.unwrap();
        (store, business.id)
    }

    #[tokio::test]
    async fn test_submit_moves_business_to_pending() {
        let (store, id) = store_with_business().await;
        let service = VerificationService::new(store.clone());

        let input = SubmitVerificationInput {
            verification_type: Some(VerificationType::Video),
            permit: true,
            ..Default::default()
        };
        let v = service.submit_verification(id, Uuid::new_v4(), input).await.unwrap();

        assert_eq!(v.verification_type, VerificationType::Video);
        let business = store.repo().get_business(id).await.unwrap().unwrap();
        assert_eq!(business.status, BusinessStatus::Pending);
    }

    #[tokio::test]
    async fn test_submit_unknown_business_fails() {
        let service = VerificationService::new(Store::in_memory());
        let result = service
            .submit_verification(Uuid::new_v4(), Uuid::new_v4(), SubmitVerificationInput::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_ids_leave_no_lock_entries() {
        let (store, id) = store_with_business().await;
        let service = VerificationService::new(store.clone());

        for _ in 0..1000 {
            let result = service
                .submit_verification(Uuid::new_v4(), Uuid::new_v4(), SubmitVerificationInput::default())
                .await;
            assert!(matches!(result, Err(AppError::NotFound(_))));
        }
        assert!(service.reject_business(Uuid::new_v4(), Uuid::new_v4(), "Fake").await.is_err());
        assert_eq!(store.active_locks(), 0);

        service
            .submit_verification(id, Uuid::new_v4(), SubmitVerificationInput::default())
            .await
            .unwrap();
        assert_eq!(store.active_locks(), 0);
    }

    #[tokio::test]
    async fn test_advance_without_verification_is_not_found() {
        let (store, id) = store_with_business().await;
        let service = VerificationService::new(store);
        assert!(matches!(
            service.advance_stage(id, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_approve_rejects_out_of_range_score() {
        let (store, id) = store_with_business().await;
        let service = VerificationService::new(store.clone());

        let err = service.approve_business(id, Uuid::new_v4(), 101).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "score"));

        let business = store.repo().get_business(id).await.unwrap().unwrap();
        assert_eq!(business.status, BusinessStatus::Unverified);
    }

    #[tokio::test]
    async fn test_approve_without_verification_still_verifies() {
        let (store, id) = store_with_business().await;
        let service = VerificationService::new(store);

        let business = service.approve_business(id, Uuid::new_v4(), 60).await.unwrap();
        assert!(business.is_verified());
        assert!(service.get_verification(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reject_keeps_stage_and_records_reason() {
        let (store, id) = store_with_business().await;
        let service = VerificationService::new(store);
        let admin = Uuid::new_v4();

        service
            .submit_verification(id, admin, SubmitVerificationInput::default())
            .await
            .unwrap();
        service.advance_stage(id, admin).await.unwrap();

        let business = service.reject_business(id, admin, "  Permit is forged ").await.unwrap();
        assert_eq!(business.status, BusinessStatus::Rejected);

        let v = service.get_verification(id).await.unwrap().unwrap();
        assert_eq!(v.stage, VerificationStage::AddressConfirmation);
        assert_eq!(v.notes.as_deref(), Some("Permit is forged"));
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let (store, id) = store_with_business().await;
        let service = VerificationService::new(store);
        let err = service.reject_business(id, Uuid::new_v4(), "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "reason"));
    }

    #[tokio::test]
    async fn test_history_of_unknown_business() {
        let service = VerificationService::new(Store::in_memory());
        assert!(matches!(
            service.history(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
