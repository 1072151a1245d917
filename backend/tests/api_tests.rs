//! Integration tests for the HTTP API
//!
//! Requests go through the full router (auth middleware included) against an
//! in-memory store loaded with the demo data.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use authentify_backend::store::seed;
use authentify_backend::{create_app, AppState, Config};

async fn test_app() -> Router {
    let state = AppState::in_memory(Config::for_tests());
    seed::seed_demo_data(&state.store, 4).await.unwrap();
    create_app(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn login(app: &Router, email: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": seed::DEMO_PASSWORD, "role": role })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

// =============================================================================
// Public Endpoints
// =============================================================================

mod public {
    use super::*;

    #[tokio::test]
    async fn health() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["storage"], "memory");
    }

    #[tokio::test]
    async fn directory_search() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/directory/businesses?q=fresh&per_page=10",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["name"], "Fresh Market Goods");
        assert_eq!(body["pagination"]["per_page"], 10);
    }

    #[tokio::test]
    async fn directory_page_beyond_range() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/directory/businesses?page=4294967295",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["pagination"]["total_items"], 3);
    }

    #[tokio::test]
    async fn top_businesses() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/api/v1/directory/top?limit=1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["businesses"][0]["credibility_score"], 92);
    }

    #[tokio::test]
    async fn credibility_report() {
        let app = test_app().await;
        let uri = format!("/api/v1/businesses/{}/report", seed::DIGITAL_SOLUTIONS_ID);
        let (status, body) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overall_score"], 78);
        assert_eq!(body["trust_tier"], "high");
        assert_eq!(body["average_rating"], json!(5.0));
    }

    #[tokio::test]
    async fn rating_summary() {
        let app = test_app().await;
        let uri = format!("/api/v1/businesses/{}/rating", seed::SMITHS_ELECTRONICS_ID);
        let (status, body) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["average_rating"], json!(4.7));
        assert_eq!(body["total_reviews"], 3);
    }

    #[tokio::test]
    async fn unknown_business_is_404() {
        let app = test_app().await;
        let uri = format!("/api/v1/businesses/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

// =============================================================================
// Authentication
// =============================================================================

mod auth {
    use super::*;

    #[tokio::test]
    async fn login_with_wrong_role() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "customer@test.com", "password": seed::DEMO_PASSWORD, "role": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn protected_route_requires_token() {
        let app = test_app().await;
        let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_returns_profile() {
        let app = test_app().await;
        let token = login(&app, "business@test.com", "business").await;
        let (status, body) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "John Smith");
        assert_eq!(body["role"], "business");
    }

    #[tokio::test]
    async fn admin_signup_forbidden() {
        let app = test_app().await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "email": "boss@example.com",
                "name": "Boss",
                "password": "long-enough-pw",
                "role": "admin"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn guest_can_browse_but_not_review() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::POST, "/api/v1/auth/guest", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["access_token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Guest User");

        let uri = format!("/api/v1/businesses/{}/reviews", seed::FRESH_MARKET_ID);
        let (status, _) = send(
            &app,
            Method::POST,
            &uri,
            Some(&token),
            Some(json!({ "rating": 5, "comment": "Great" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

// =============================================================================
// Verification Workflow
// =============================================================================

mod workflow {
    use super::*;

    #[tokio::test]
    async fn customer_cannot_approve() {
        let app = test_app().await;
        let token = login(&app, "customer@test.com", "customer").await;
        let uri = format!("/api/v1/businesses/{}/approve", seed::DIGITAL_SOLUTIONS_ID);
        let (status, body) = send(&app, Method::POST, &uri, Some(&token), Some(json!({ "score": 99 }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "INSUFFICIENT_PERMISSIONS");
    }

    #[tokio::test]
    async fn approve_out_of_range_score() {
        let app = test_app().await;
        let token = login(&app, "admin@test.com", "admin").await;
        let uri = format!("/api/v1/businesses/{}/approve", seed::DIGITAL_SOLUTIONS_ID);
        let (status, body) = send(&app, Method::POST, &uri, Some(&token), Some(json!({ "score": 150 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "score");
    }

    #[tokio::test]
    async fn owner_lists_and_verifies_a_business() {
        let app = test_app().await;
        let owner = login(&app, "business@test.com", "business").await;
        let admin = login(&app, "admin@test.com", "admin").await;

        // List a business
        let (status, business) = send(
            &app,
            Method::POST,
            "/api/v1/businesses",
            Some(&owner),
            Some(json!({
                "name": "Lakeside Books",
                "category": "Education",
                "phone": "+1 312 555 0199",
                "address": "40 Lake Shore Dr, Chicago, IL"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(business["status"], "unverified");
        let id = business["id"].as_str().unwrap().to_string();

        // Submit documents
        let (status, verification) = send(
            &app,
            Method::POST,
            &format!("/api/v1/businesses/{}/verification", id),
            Some(&owner),
            Some(json!({ "permit": true, "id": false })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(verification["stage"], "documents_review");
        assert_eq!(verification["progress"], 25);
        assert_eq!(verification["permit_verified"], true);
        assert_eq!(verification["id_verified"], false);

        // Admin advances and approves
        let (status, verification) = send(
            &app,
            Method::POST,
            &format!("/api/v1/businesses/{}/verification/advance", id),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verification["stage"], "address_confirmation");

        let (status, approved) = send(
            &app,
            Method::POST,
            &format!("/api/v1/businesses/{}/approve", id),
            Some(&admin),
            Some(json!({ "score": 64 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(approved["status"], "verified");
        assert_eq!(approved["verified_badge"], true);

        // Now public, with a medium tier
        let (_, report) = send(&app, Method::GET, &format!("/api/v1/businesses/{}/report", id), None, None).await;
        assert_eq!(report["overall_score"], 64);
        assert_eq!(report["trust_tier"], "medium");
        assert_eq!(report["score_color"], "yellow");
        assert_eq!(report["verification"]["progress"], 100);

        // Owner sees the full history
        let (status, history) = send(
            &app,
            Method::GET,
            &format!("/api/v1/businesses/{}/verification/history", id),
            Some(&owner),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let kinds: Vec<&str> = history
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["submitted", "stage_advanced", "approved"]);
    }

    #[tokio::test]
    async fn owner_cannot_submit_for_someone_else() {
        let app = test_app().await;
        let owner = login(&app, "business@test.com", "business").await;
        // Fresh Market Goods belongs to a different owner
        let uri = format!("/api/v1/businesses/{}/verification", seed::FRESH_MARKET_ID);
        let (status, _) = send(&app, Method::POST, &uri, Some(&owner), Some(json!({ "permit": true }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn advancing_past_field_verification_is_rejected() {
        let app = test_app().await;
        let admin = login(&app, "admin@test.com", "admin").await;
        // Seeded at field_verification
        let uri = format!("/api/v1/businesses/{}/verification/advance", seed::FRESH_MARKET_ID);
        let (status, body) = send(&app, Method::POST, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_STATE_TRANSITION");
    }

    #[tokio::test]
    async fn reject_requires_reason() {
        let app = test_app().await;
        let admin = login(&app, "admin@test.com", "admin").await;
        let uri = format!("/api/v1/businesses/{}/reject", seed::FRESH_MARKET_ID);

        let (status, _) = send(&app, Method::POST, &uri, Some(&admin), Some(json!({ "reason": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            &uri,
            Some(&admin),
            Some(json!({ "reason": "Storefront does not exist" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["credibility_score"], 85);
    }

    #[tokio::test]
    async fn admin_console_filters() {
        let app = test_app().await;
        let admin = login(&app, "admin@test.com", "admin").await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/admin/verifications?filter=pending",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["verifications"].as_array().unwrap().len(), 2);

        let (_, body) = send(
            &app,
            Method::GET,
            "/api/v1/admin/verifications?filter=approved",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(body["verifications"].as_array().unwrap().len(), 1);
    }
}

// =============================================================================
// Reviews and Fraud Reports
// =============================================================================

mod feedback {
    use super::*;

    #[tokio::test]
    async fn customer_posts_review() {
        let app = test_app().await;
        let token = login(&app, "customer@test.com", "customer").await;
        let uri = format!("/api/v1/businesses/{}/reviews", seed::DIGITAL_SOLUTIONS_ID);

        let (status, review) = send(
            &app,
            Method::POST,
            &uri,
            Some(&token),
            Some(json!({ "rating": 4, "comment": "Solid support contract" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(review["user_name"], "Sarah Chen");

        let (_, reviews) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(reviews.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_rating_rejected() {
        let app = test_app().await;
        let token = login(&app, "customer@test.com", "customer").await;
        let uri = format!("/api/v1/businesses/{}/reviews", seed::DIGITAL_SOLUTIONS_ID);
        let (status, body) = send(
            &app,
            Method::POST,
            &uri,
            Some(&token),
            Some(json!({ "rating": 9, "comment": "Too good" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "rating");
    }

    #[tokio::test]
    async fn fraud_report_visible_to_admin_only() {
        let app = test_app().await;
        let customer = login(&app, "customer@test.com", "customer").await;
        let admin = login(&app, "admin@test.com", "admin").await;

        let uri = format!("/api/v1/businesses/{}/fraud-reports", seed::FRESH_MARKET_ID);
        let (status, _) = send(
            &app,
            Method::POST,
            &uri,
            Some(&customer),
            Some(json!({ "reason": "scam_activity", "notes": "Never delivered" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(&app, Method::GET, "/api/v1/admin/fraud-reports", Some(&customer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, Method::GET, "/api/v1/admin/fraud-reports", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reports"][0]["reason"], "scam_activity");
    }
}
