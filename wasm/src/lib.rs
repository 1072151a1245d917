//! WebAssembly module for the Authentify mobile client
//!
//! Provides client-side computation for:
//! - Trust tier classification of credibility scores
//! - Average rating display
//! - Verification stage labels and progress
//! - Offline validation of listings and reviews

use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("authentify-wasm ready"));
}

fn parse_stage(stage: &str) -> Result<VerificationStage, JsValue> {
    stage
        .parse::<VerificationStage>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Trust tier of a credibility score ("high", "medium" or "low")
#[wasm_bindgen]
pub fn trust_tier(score: i32) -> String {
    match classify_trust_score(score) {
        TrustTier::High => "high",
        TrustTier::Medium => "medium",
        TrustTier::Low => "low",
    }
    .to_string()
}

/// Human readable trust label, e.g. "High Trust"
#[wasm_bindgen]
pub fn trust_label(score: i32) -> String {
    classify_trust_score(score).label().to_string()
}

/// Badge color for a credibility score
#[wasm_bindgen]
pub fn score_color(score: i32) -> String {
    match classify_trust_score(score).color() {
        ScoreColor::Green => "green",
        ScoreColor::Yellow => "yellow",
        ScoreColor::Red => "red",
    }
    .to_string()
}

/// Average of star ratings to one decimal; 0 when there are none
#[wasm_bindgen]
pub fn average_rating_of(ratings: &[i32]) -> f64 {
    average_of(ratings.iter().copied()).to_f64().unwrap_or(0.0)
}

/// Display label of a stage name such as "field_verification"
#[wasm_bindgen]
pub fn stage_label(stage: &str) -> Result<String, JsValue> {
    Ok(parse_stage(stage)?.to_string())
}

/// Progress percentage of a stage name
#[wasm_bindgen]
pub fn stage_progress(stage: &str) -> Result<i32, JsValue> {
    Ok(parse_stage(stage)?.progress())
}

/// Working days left from the start of a stage
#[wasm_bindgen]
pub fn stage_days_remaining(stage: &str) -> Result<i32, JsValue> {
    Ok(parse_stage(stage)?.estimated_days_remaining())
}

/// Stage names in workflow order
#[wasm_bindgen]
pub fn verification_stages() -> js_sys::Array {
    VerificationStage::ALL
        .iter()
        .map(|stage| JsValue::from_str(stage.as_str()))
        .collect()
}

/// Check a star rating before it is queued for upload
#[wasm_bindgen]
pub fn is_valid_rating(rating: i32) -> bool {
    validate_rating(rating).is_ok()
}

/// Check a credibility score entered in the admin console
#[wasm_bindgen]
pub fn is_valid_credibility_score(score: i32) -> bool {
    validate_credibility_score(score).is_ok()
}

/// First problem found in a review draft, if any
#[wasm_bindgen]
pub fn review_problem(rating: i32, comment: &str) -> Option<String> {
    validate_rating(rating)
        .and_then(|_| validate_review_comment(comment))
        .err()
        .map(str::to_string)
}

/// First problem found in a listing draft given as JSON, if any
#[wasm_bindgen]
pub fn listing_problem(input_json: &str) -> Option<String> {
    let input: RegisterBusinessInput = match serde_json::from_str(input_json) {
        Ok(input) => input,
        Err(e) => return Some(format!("Invalid listing JSON: {}", e)),
    };
    check_listing(&input).err().map(str::to_string)
}

fn check_listing(input: &RegisterBusinessInput) -> Result<(), &'static str> {
    validate_business_name(&input.name)?;
    if input.category.trim().is_empty() {
        return Err("Category is required");
    }
    validate_phone(&input.phone)?;
    if input.address.trim().is_empty() {
        return Err("Address is required");
    }
    if let Some(url) = input.website.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
        validate_website(url)?;
    }
    if let Some(location) = &input.location {
        validate_coordinates(location)?;
    }
    Ok(())
}
