//! Credibility reports and fraud reports

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    average_rating, classify_trust_score, Business, ParseEnumError, Review, ScoreColor, TrustTier,
    Verification,
};

/// Public credibility summary of a business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredibilityReport {
    pub business_id: Uuid,
    pub business_name: String,
    pub logo: Option<String>,
    pub verified_badge: bool,
    /// Present only for verified businesses
    pub overall_score: Option<i32>,
    pub score_color: Option<ScoreColor>,
    pub trust_tier: Option<TrustTier>,
    pub verification: Option<Verification>,
    pub reviews: Vec<Review>,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_rating: Decimal,
    pub total_reviews: usize,
    pub address: String,
    pub phone: String,
    pub website: Option<String>,
}

impl CredibilityReport {
    pub fn assemble(business: &Business, verification: Option<Verification>, reviews: Vec<Review>) -> Self {
        let overall_score = business.displayed_score();
        let trust_tier = overall_score.map(classify_trust_score);

        Self {
            business_id: business.id,
            business_name: business.name.clone(),
            logo: business.logo.clone(),
            verified_badge: business.verified_badge,
            overall_score,
            score_color: trust_tier.map(|t| t.color()),
            trust_tier,
            verification,
            average_rating: average_rating(&reviews),
            total_reviews: reviews.len(),
            reviews,
            address: business.address.clone(),
            phone: business.phone.clone(),
            website: business.website.clone(),
        }
    }
}

/// Why a customer flagged a business
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FraudReason {
    FakeBusiness,
    ScamActivity,
    InaccurateInformation,
    Impersonation,
    Other,
}

impl FraudReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FraudReason::FakeBusiness => "fake_business",
            FraudReason::ScamActivity => "scam_activity",
            FraudReason::InaccurateInformation => "inaccurate_information",
            FraudReason::Impersonation => "impersonation",
            FraudReason::Other => "other",
        }
    }
}

impl std::fmt::Display for FraudReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FraudReason::FakeBusiness => write!(f, "Fake Business"),
            FraudReason::ScamActivity => write!(f, "Scam Activity"),
            FraudReason::InaccurateInformation => write!(f, "Inaccurate Information"),
            FraudReason::Impersonation => write!(f, "Impersonation"),
            FraudReason::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for FraudReason {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fake_business" => Ok(FraudReason::FakeBusiness),
            "scam_activity" => Ok(FraudReason::ScamActivity),
            "inaccurate_information" => Ok(FraudReason::InaccurateInformation),
            "impersonation" => Ok(FraudReason::Impersonation),
            "other" => Ok(FraudReason::Other),
            other => Err(ParseEnumError::new("fraud reason", other)),
        }
    }
}

/// A customer's report that a business may be fraudulent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FraudReport {
    pub id: Uuid,
    pub business_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: FraudReason,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for flagging a business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFraudReportInput {
    pub reason: FraudReason,
    pub notes: Option<String>,
}
