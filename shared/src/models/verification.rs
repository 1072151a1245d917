//! Verification workflow models
//!
//! A business has at most one current [`Verification`]. Every change to it is
//! also recorded as a [`VerificationEvent`] so resubmissions do not erase the
//! audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::ParseEnumError;

/// How the business is being verified
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationType {
    #[default]
    Document,
    Field,
    Video,
}

impl VerificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationType::Document => "document",
            VerificationType::Field => "field",
            VerificationType::Video => "video",
        }
    }
}

impl std::str::FromStr for VerificationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(VerificationType::Document),
            "field" => Ok(VerificationType::Field),
            "video" => Ok(VerificationType::Video),
            other => Err(ParseEnumError::new("verification type", other)),
        }
    }
}

/// Ordered stages of the vetting workflow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStage {
    DocumentsReview,
    AddressConfirmation,
    FieldVerification,
    FinalApproval,
}

impl VerificationStage {
    pub const ALL: [VerificationStage; 4] = [
        VerificationStage::DocumentsReview,
        VerificationStage::AddressConfirmation,
        VerificationStage::FieldVerification,
        VerificationStage::FinalApproval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStage::DocumentsReview => "documents_review",
            VerificationStage::AddressConfirmation => "address_confirmation",
            VerificationStage::FieldVerification => "field_verification",
            VerificationStage::FinalApproval => "final_approval",
        }
    }

    /// Progress percentage shown while the verification sits in this stage
    pub fn progress(&self) -> i32 {
        match self {
            VerificationStage::DocumentsReview => 25,
            VerificationStage::AddressConfirmation => 50,
            VerificationStage::FieldVerification => 75,
            VerificationStage::FinalApproval => 100,
        }
    }

    /// Expected working days until approval from the start of this stage
    pub fn estimated_days_remaining(&self) -> i32 {
        match self {
            VerificationStage::DocumentsReview => 7,
            VerificationStage::AddressConfirmation => 5,
            VerificationStage::FieldVerification => 3,
            VerificationStage::FinalApproval => 0,
        }
    }

    pub fn next(&self) -> Option<VerificationStage> {
        match self {
            VerificationStage::DocumentsReview => Some(VerificationStage::AddressConfirmation),
            VerificationStage::AddressConfirmation => Some(VerificationStage::FieldVerification),
            VerificationStage::FieldVerification => Some(VerificationStage::FinalApproval),
            VerificationStage::FinalApproval => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == VerificationStage::FinalApproval
    }
}

impl std::fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStage::DocumentsReview => write!(f, "Documents Review"),
            VerificationStage::AddressConfirmation => write!(f, "Address Confirmation"),
            VerificationStage::FieldVerification => write!(f, "Field Verification"),
            VerificationStage::FinalApproval => write!(f, "Final Approval"),
        }
    }
}

impl std::str::FromStr for VerificationStage {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "documents_review" => Ok(VerificationStage::DocumentsReview),
            "address_confirmation" => Ok(VerificationStage::AddressConfirmation),
            "field_verification" => Ok(VerificationStage::FieldVerification),
            "final_approval" => Ok(VerificationStage::FinalApproval),
            other => Err(ParseEnumError::new("verification stage", other)),
        }
    }
}

/// Errors raised by stage transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("verification already reached {0}")]
    AlreadyFinal(VerificationStage),

    #[error("{0} can only be reached by approving the business")]
    RequiresApproval(VerificationStage),
}

/// Current verification record for a business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verification {
    pub id: Uuid,
    pub business_id: Uuid,
    pub verifier_id: Option<Uuid>,
    pub verification_type: VerificationType,
    pub stage: VerificationStage,
    pub progress: i32,
    pub estimated_days_remaining: i32,
    pub permit_verified: bool,
    pub id_verified: bool,
    pub address_confirmed: bool,
    pub social_presence_checked: bool,
    pub field_visit_done: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Verification {
    /// Fresh record for a (re)submitted verification request
    pub fn submitted(business_id: Uuid, input: &SubmitVerificationInput, now: DateTime<Utc>) -> Self {
        let stage = VerificationStage::DocumentsReview;
        Self {
            id: Uuid::new_v4(),
            business_id,
            verifier_id: None,
            verification_type: input.verification_type.unwrap_or_default(),
            stage,
            progress: stage.progress(),
            estimated_days_remaining: stage.estimated_days_remaining(),
            permit_verified: input.permit,
            id_verified: input.id_document,
            address_confirmed: false,
            social_presence_checked: false,
            field_visit_done: false,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to the next stage. Final approval is reserved for
    /// [`Verification::mark_approved`].
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<VerificationStage, WorkflowError> {
        let next = self
            .stage
            .next()
            .ok_or(WorkflowError::AlreadyFinal(self.stage))?;
        if next.is_terminal() {
            return Err(WorkflowError::RequiresApproval(next));
        }
        self.enter_stage(next, now);
        Ok(next)
    }

    pub fn mark_approved(&mut self, now: DateTime<Utc>) {
        self.enter_stage(VerificationStage::FinalApproval, now);
    }

    fn enter_stage(&mut self, stage: VerificationStage, now: DateTime<Utc>) {
        self.stage = stage;
        self.progress = self.progress.max(stage.progress());
        self.estimated_days_remaining = stage.estimated_days_remaining();
        self.updated_at = now;
    }

    pub fn apply_checklist(&mut self, update: &ChecklistUpdate, verifier_id: Uuid, now: DateTime<Utc>) {
        if let Some(v) = update.permit_verified {
            self.permit_verified = v;
        }
        if let Some(v) = update.id_verified {
            self.id_verified = v;
        }
        if let Some(v) = update.address_confirmed {
            self.address_confirmed = v;
        }
        if let Some(v) = update.social_presence_checked {
            self.social_presence_checked = v;
        }
        if let Some(v) = update.field_visit_done {
            self.field_visit_done = v;
        }
        if update.notes.is_some() {
            self.notes = update.notes.clone();
        }
        self.verifier_id = Some(verifier_id);
        self.updated_at = now;
    }

    /// Number of checklist items ticked (0-5)
    pub fn checklist_count(&self) -> usize {
        [
            self.permit_verified,
            self.id_verified,
            self.address_confirmed,
            self.social_presence_checked,
            self.field_visit_done,
        ]
        .iter()
        .filter(|done| **done)
        .count()
    }

    pub fn checklist_complete(&self) -> bool {
        self.checklist_count() == 5
    }

    pub fn is_approved(&self) -> bool {
        self.stage.is_terminal()
    }
}

/// Input for submitting a verification request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitVerificationInput {
    #[serde(default, rename = "type")]
    pub verification_type: Option<VerificationType>,
    /// Business permit supplied
    #[serde(default)]
    pub permit: bool,
    /// Owner identity document supplied
    #[serde(default, alias = "id")]
    pub id_document: bool,
    pub notes: Option<String>,
}

/// Partial update of the verification checklist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecklistUpdate {
    pub permit_verified: Option<bool>,
    pub id_verified: Option<bool>,
    pub address_confirmed: Option<bool>,
    pub social_presence_checked: Option<bool>,
    pub field_visit_done: Option<bool>,
    pub notes: Option<String>,
}

/// Kind of workflow transition recorded in the event log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationEventKind {
    Submitted,
    StageAdvanced,
    ChecklistUpdated,
    Approved,
    Rejected,
}

impl VerificationEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationEventKind::Submitted => "submitted",
            VerificationEventKind::StageAdvanced => "stage_advanced",
            VerificationEventKind::ChecklistUpdated => "checklist_updated",
            VerificationEventKind::Approved => "approved",
            VerificationEventKind::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for VerificationEventKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(VerificationEventKind::Submitted),
            "stage_advanced" => Ok(VerificationEventKind::StageAdvanced),
            "checklist_updated" => Ok(VerificationEventKind::ChecklistUpdated),
            "approved" => Ok(VerificationEventKind::Approved),
            "rejected" => Ok(VerificationEventKind::Rejected),
            other => Err(ParseEnumError::new("verification event kind", other)),
        }
    }
}

/// Append-only audit entry for one workflow transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationEvent {
    pub id: Uuid,
    pub business_id: Uuid,
    pub verification_id: Option<Uuid>,
    pub kind: VerificationEventKind,
    pub stage: Option<VerificationStage>,
    pub progress: Option<i32>,
    pub actor_id: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VerificationEvent {
    pub fn record(
        kind: VerificationEventKind,
        business_id: Uuid,
        verification: Option<&Verification>,
        actor_id: Option<Uuid>,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            business_id,
            verification_id: verification.map(|v| v.id),
            kind,
            stage: verification.map(|v| v.stage),
            progress: verification.map(|v| v.progress),
            actor_id,
            note,
            created_at: now,
        }
    }
}

/// Admin console filter over verifications
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationFilter {
    #[default]
    All,
    Pending,
    Approved,
}

impl VerificationFilter {
    pub fn matches(&self, verification: &Verification) -> bool {
        match self {
            VerificationFilter::All => true,
            VerificationFilter::Pending => !verification.is_approved(),
            VerificationFilter::Approved => verification.is_approved(),
        }
    }
}
