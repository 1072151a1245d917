//! Validation utilities for the Authentify business directory
//!
//! Store and service boundaries call these before mutating any record.

use rust_decimal::Decimal;

use crate::types::GpsCoordinates;

// ============================================================================
// Verification Validations
// ============================================================================

/// Validate credibility score is within 0-100
pub fn validate_credibility_score(score: i32) -> Result<(), &'static str> {
    if !(0..=100).contains(&score) {
        return Err("Credibility score must be between 0 and 100");
    }
    Ok(())
}

/// Validate verification progress is within 0-100
pub fn validate_progress(progress: i32) -> Result<(), &'static str> {
    if !(0..=100).contains(&progress) {
        return Err("Progress must be between 0 and 100");
    }
    Ok(())
}

/// Validate a rejection reason is present
pub fn validate_rejection_reason(reason: &str) -> Result<(), &'static str> {
    if reason.trim().is_empty() {
        return Err("Rejection reason is required");
    }
    Ok(())
}

// ============================================================================
// Review Validations
// ============================================================================

/// Validate star rating (1-5)
pub fn validate_rating(rating: i32) -> Result<(), &'static str> {
    if !(1..=5).contains(&rating) {
        return Err("Rating must be between 1 and 5");
    }
    Ok(())
}

/// Validate review text is present
pub fn validate_review_comment(comment: &str) -> Result<(), &'static str> {
    if comment.trim().is_empty() {
        return Err("Review comment is required");
    }
    if comment.chars().count() > 2000 {
        return Err("Review comment must be at most 2000 characters");
    }
    Ok(())
}

// ============================================================================
// Business Listing Validations
// ============================================================================

/// Validate business name is present
pub fn validate_business_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Business name is required");
    }
    if name.chars().count() > 200 {
        return Err("Business name must be at most 200 characters");
    }
    Ok(())
}

/// Validate phone number (digits, letters for vanity numbers, separators)
/// Accepts: +1-800-555-0101, +1-800-SMITH-01, 0812345678
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Err("Phone number is required");
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.'))
    {
        return Err("Phone number contains invalid characters");
    }
    let significant = trimmed.chars().filter(|c| c.is_ascii_alphanumeric()).count();
    if !(7..=15).contains(&significant) {
        return Err("Phone number must have 7 to 15 digits");
    }
    Ok(())
}

/// Validate website URL scheme
pub fn validate_website(url: &str) -> Result<(), &'static str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or("Website must start with http:// or https://")?;
    if !rest.contains('.') {
        return Err("Website must include a domain");
    }
    Ok(())
}

/// Validate GPS coordinates are on the globe
pub fn validate_coordinates(location: &GpsCoordinates) -> Result<(), &'static str> {
    if location.latitude < Decimal::from(-90) || location.latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if location.longitude < Decimal::from(-180) || location.longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_credibility_score_bounds() {
        assert!(validate_credibility_score(0).is_ok());
        assert!(validate_credibility_score(92).is_ok());
        assert!(validate_credibility_score(100).is_ok());
        assert!(validate_credibility_score(-1).is_err());
        assert!(validate_credibility_score(101).is_err());
    }

    #[test]
    fn test_validate_progress_bounds() {
        assert!(validate_progress(25).is_ok());
        assert!(validate_progress(150).is_err());
    }

    #[test]
    fn test_validate_rating() {
        for rating in 1..=5 {
            assert!(validate_rating(rating).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_validate_review_comment() {
        assert!(validate_review_comment("Great shop").is_ok());
        assert!(validate_review_comment("   ").is_err());
        assert!(validate_review_comment(&"x".repeat(2001)).is_err());
    }

    #[test]
    fn test_validate_business_name() {
        assert!(validate_business_name("Smith's Electronics").is_ok());
        assert!(validate_business_name("").is_err());
    }

    #[test]
    fn test_validate_phone_valid() {
        assert!(validate_phone("+1-800-SMITH-01").is_ok());
        assert!(validate_phone("081-234-5678").is_ok());
        assert!(validate_phone("(415) 555 0101").is_ok());
    }

    #[test]
    fn test_validate_phone_invalid() {
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("555#0101#99").is_err());
    }

    #[test]
    fn test_validate_website() {
        assert!(validate_website("https://smithselectronics.com").is_ok());
        assert!(validate_website("http://example.org/shop").is_ok());
        assert!(validate_website("smithselectronics.com").is_err());
        assert!(validate_website("https://localhost").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        let sf = GpsCoordinates::from_degrees(37.7749, -122.4194).unwrap();
        assert!(validate_coordinates(&sf).is_ok());
        let bad = GpsCoordinates::new(Decimal::from(91), Decimal::ZERO);
        assert!(validate_coordinates(&bad).is_err());
    }

    #[test]
    fn test_validate_rejection_reason() {
        assert!(validate_rejection_reason("Permit expired").is_ok());
        assert!(validate_rejection_reason(" ").is_err());
    }
}
