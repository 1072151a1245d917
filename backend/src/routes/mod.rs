//! Route definitions for the Authentify API

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state))
}

/// Routes readable without signing in
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Auth
        .route("/auth/login", post(handlers::login))
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/guest", post(handlers::guest))
        // Directory
        .route("/directory/businesses", get(handlers::list_verified_businesses))
        .route("/directory/categories", get(handlers::list_categories))
        .route("/directory/top", get(handlers::top_verified_businesses))
        // Business details
        .route("/businesses/:business_id", get(handlers::get_business))
        .route("/businesses/:business_id/verification", get(handlers::get_verification))
        .route("/businesses/:business_id/reviews", get(handlers::list_reviews))
        .route("/businesses/:business_id/rating", get(handlers::get_rating))
        .route("/businesses/:business_id/report", get(handlers::credibility_report))
}

/// Routes requiring a bearer token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(handlers::me))
        .route("/me/businesses", get(handlers::list_my_businesses))
        .route("/businesses", post(handlers::register_business))
        .route(
            "/businesses/:business_id/verification",
            post(handlers::submit_verification),
        )
        .route(
            "/businesses/:business_id/verification/advance",
            post(handlers::advance_stage),
        )
        .route(
            "/businesses/:business_id/verification/checklist",
            patch(handlers::update_checklist),
        )
        .route(
            "/businesses/:business_id/verification/history",
            get(handlers::verification_history),
        )
        .route("/businesses/:business_id/approve", post(handlers::approve_business))
        .route("/businesses/:business_id/reject", post(handlers::reject_business))
        .route("/businesses/:business_id/reviews", post(handlers::submit_review))
        .route(
            "/businesses/:business_id/fraud-reports",
            post(handlers::submit_fraud_report),
        )
        // Admin console
        .route("/admin/verifications", get(handlers::list_verifications))
        .route("/admin/fraud-reports", get(handlers::list_fraud_reports))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
