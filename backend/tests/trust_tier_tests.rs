//! Tests for trust tier classification
//! Verifies tier boundaries, labels and colors

use proptest::prelude::*;
use shared::{
    classify_trust_score, ScoreColor, TrustTier, HIGH_TRUST_THRESHOLD, MODERATE_TRUST_THRESHOLD,
};

// =============================================================================
// Boundary Tests
// Lower bounds are inclusive: 75 is high, 50 is medium
// =============================================================================

mod boundaries {
    use super::*;

    #[test]
    fn seventy_five_is_high() {
        assert_eq!(classify_trust_score(75), TrustTier::High);
    }

    #[test]
    fn seventy_four_is_medium() {
        assert_eq!(classify_trust_score(74), TrustTier::Medium);
    }

    #[test]
    fn fifty_is_medium() {
        assert_eq!(classify_trust_score(50), TrustTier::Medium);
    }

    #[test]
    fn forty_nine_is_low() {
        assert_eq!(classify_trust_score(49), TrustTier::Low);
    }

    #[test]
    fn total_over_all_integers() {
        assert_eq!(classify_trust_score(i32::MIN), TrustTier::Low);
        assert_eq!(classify_trust_score(-1), TrustTier::Low);
        assert_eq!(classify_trust_score(101), TrustTier::High);
        assert_eq!(classify_trust_score(i32::MAX), TrustTier::High);
    }
}

// =============================================================================
// Display Tests
// =============================================================================

mod display {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(TrustTier::High.label(), "High Trust");
        assert_eq!(TrustTier::Medium.label(), "Moderate Trust");
        assert_eq!(TrustTier::Low.to_string(), "Low Trust");
    }

    #[test]
    fn colors() {
        assert_eq!(classify_trust_score(92).color(), ScoreColor::Green);
        assert_eq!(classify_trust_score(60).color(), ScoreColor::Yellow);
        assert_eq!(classify_trust_score(10).color(), ScoreColor::Red);
    }

    #[test]
    fn serialized_names() {
        assert_eq!(serde_json::to_string(&TrustTier::Medium).unwrap(), "\"medium\"");
        assert_eq!(serde_json::to_string(&ScoreColor::Green).unwrap(), "\"green\"");
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Tier is determined only by which threshold the score reaches
    #[test]
    fn tier_matches_thresholds(score in any::<i32>()) {
        let expected = if score >= HIGH_TRUST_THRESHOLD {
            TrustTier::High
        } else if score >= MODERATE_TRUST_THRESHOLD {
            TrustTier::Medium
        } else {
            TrustTier::Low
        };
        prop_assert_eq!(classify_trust_score(score), expected);
    }

    /// A higher score never lands in a lower tier
    #[test]
    fn tier_is_monotonic(a in -1000i32..1000, b in -1000i32..1000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify_trust_score(low) <= classify_trust_score(high));
    }
}
