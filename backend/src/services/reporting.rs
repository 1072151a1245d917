//! Credibility and fraud reporting service

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::Store;
use shared::{CredibilityReport, FraudReport, SubmitFraudReportInput};

/// Fraud report notes longer than this are rejected
const MAX_FRAUD_NOTES_CHARS: usize = 2000;

#[derive(Clone)]
pub struct ReportingService {
    store: Store,
}

impl ReportingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Public credibility summary of a business
    pub async fn credibility_report(&self, business_id: Uuid) -> AppResult<CredibilityReport> {
        let repo = self.store.repo();

        let business = repo
            .get_business(business_id)
            .await?
            .ok_or_else(|| AppError::not_found("Business"))?;
        let verification = repo.get_verification(business_id).await?;
        let reviews = repo.list_reviews(business_id).await?;

        Ok(CredibilityReport::assemble(&business, verification, reviews))
    }

    pub async fn submit_fraud_report(
        &self,
        business_id: Uuid,
        reporter_id: Uuid,
        input: SubmitFraudReportInput,
    ) -> AppResult<FraudReport> {
        let notes = input
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if notes
            .as_ref()
            .is_some_and(|n| n.chars().count() > MAX_FRAUD_NOTES_CHARS)
        {
            return Err(AppError::validation(
                "notes",
                "Notes must be at most 2000 characters",
            ));
        }

        if self.store.repo().get_business(business_id).await?.is_none() {
            return Err(AppError::not_found("Business"));
        }

        let report = FraudReport {
            id: Uuid::new_v4(),
            business_id,
            reporter_id,
            reason: input.reason,
            notes,
            created_at: Utc::now(),
        };

        self.store.repo().insert_fraud_report(&report).await?;

        tracing::warn!(
            "Fraud report {} filed against business {}: {}",
            report.id,
            business_id,
            report.reason
        );

        Ok(report)
    }

    /// Fraud reports, optionally restricted to one business
    pub async fn list_fraud_reports(&self, business_id: Option<Uuid>) -> AppResult<Vec<FraudReport>> {
        self.store.repo().list_fraud_reports(business_id).await
    }
}
