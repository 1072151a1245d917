//! Business directory models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ParseEnumError;
use crate::types::GpsCoordinates;

/// Verification status of a listed business
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    #[default]
    Unverified,
    Pending,
    Verified,
    Rejected,
}

impl BusinessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessStatus::Unverified => "unverified",
            BusinessStatus::Pending => "pending",
            BusinessStatus::Verified => "verified",
            BusinessStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for BusinessStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unverified" => Ok(BusinessStatus::Unverified),
            "pending" => Ok(BusinessStatus::Pending),
            "verified" => Ok(BusinessStatus::Verified),
            "rejected" => Ok(BusinessStatus::Rejected),
            other => Err(ParseEnumError::new("business status", other)),
        }
    }
}

/// A business listed in the directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Business {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub category: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: String,
    pub location: Option<GpsCoordinates>,
    pub logo: Option<String>,
    pub description: Option<String>,
    /// References to uploaded documents (permit, owner ID, ...)
    pub documents: Vec<String>,
    /// 0-100, only meaningful once `status` is `Verified`
    pub credibility_score: i32,
    pub status: BusinessStatus,
    pub verified_badge: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    pub fn is_verified(&self) -> bool {
        self.status == BusinessStatus::Verified
    }

    /// Credibility score, hidden until the business has been verified
    pub fn displayed_score(&self) -> Option<i32> {
        self.is_verified().then_some(self.credibility_score)
    }
}

/// Input for listing a new business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBusinessInput {
    pub name: String,
    pub category: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: String,
    pub location: Option<GpsCoordinates>,
    pub logo: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Default categories offered when listing a business
pub const BUSINESS_CATEGORIES: &[&str] = &[
    "Electronics",
    "Retail",
    "Services",
    "Food & Beverage",
    "Health & Wellness",
    "Education",
    "Finance",
    "Real Estate",
];
