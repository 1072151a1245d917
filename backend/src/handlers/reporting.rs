//! Credibility and fraud report handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ReportingService;
use crate::AppState;
use shared::{CredibilityReport, FraudReport, SubmitFraudReportInput};

#[derive(Debug, Deserialize)]
pub struct FraudReportQuery {
    pub business_id: Option<Uuid>,
}

/// Public credibility report of a business
pub async fn credibility_report(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> AppResult<Json<CredibilityReport>> {
    let report = ReportingService::new(state.store.clone())
        .credibility_report(business_id)
        .await?;
    Ok(Json(report))
}

/// Flag a business as possibly fraudulent
pub async fn submit_fraud_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(business_id): Path<Uuid>,
    Json(input): Json<SubmitFraudReportInput>,
) -> AppResult<(StatusCode, Json<FraudReport>)> {
    user.require_account()?;
    let report = ReportingService::new(state.store.clone())
        .submit_fraud_report(business_id, user.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Fraud reports for the admin console
pub async fn list_fraud_reports(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<FraudReportQuery>,
) -> AppResult<Json<serde_json::Value>> {
    user.require_admin()?;
    let reports = ReportingService::new(state.store.clone())
        .list_fraud_reports(query.business_id)
        .await?;
    Ok(Json(serde_json::json!({ "reports": reports })))
}
