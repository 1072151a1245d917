//! Trust tier classification of credibility scores

use serde::{Deserialize, Serialize};

/// Lowest score in the high trust tier
pub const HIGH_TRUST_THRESHOLD: i32 = 75;
/// Lowest score in the medium trust tier
pub const MODERATE_TRUST_THRESHOLD: i32 = 50;

/// Qualitative bucket for a credibility score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    Low,
    Medium,
    High,
}

/// Display color used for a score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoreColor {
    Red,
    Yellow,
    Green,
}

impl TrustTier {
    pub fn label(&self) -> &'static str {
        match self {
            TrustTier::High => "High Trust",
            TrustTier::Medium => "Moderate Trust",
            TrustTier::Low => "Low Trust",
        }
    }

    pub fn color(&self) -> ScoreColor {
        match self {
            TrustTier::High => ScoreColor::Green,
            TrustTier::Medium => ScoreColor::Yellow,
            TrustTier::Low => ScoreColor::Red,
        }
    }
}

impl std::fmt::Display for TrustTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a credibility score; lower bounds are inclusive
pub fn classify_trust_score(score: i32) -> TrustTier {
    match score {
        s if s >= HIGH_TRUST_THRESHOLD => TrustTier::High,
        s if s >= MODERATE_TRUST_THRESHOLD => TrustTier::Medium,
        _ => TrustTier::Low,
    }
}
