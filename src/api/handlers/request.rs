use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::FetchTicketsRequest;
use crate::api::dtos::responses::{MessageResponse, RequestLogsResponse};
use crate::api::extractors::{auth::ApiAuth, company::CompanyId};
use crate::domain::models::request::ReportRequest;
use crate::domain::models::ticket::TicketQuery;
use crate::domain::services::{dates, format};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a report request and runs the pipeline in the background. The
/// response carries the request id for status polling.
pub async fn fetch_tickets(
    State(state): State<Arc<AppState>>,
    _auth: ApiAuth,
    Json(payload): Json<FetchTicketsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let company = state.company_repo.find_by_id(&payload.company_id).await?
        .filter(|c| c.is_active)
        .ok_or(AppError::NotFound("Company not found or inactive".into()))?;

    // The stored setting wins over the environment default, so operators
    // can raise the warning threshold without a restart.
    let max_days = state.config_repo.get("max_date_range_days").await?
        .and_then(|entry| entry.config_value)
        .and_then(|value| value.parse().ok())
        .unwrap_or(state.config.max_date_range_days);

    dates::validate_range(&payload.date_start, payload.date_end.as_deref(), max_days)?;

    let email_to = match payload.email_to.filter(|e| !e.trim().is_empty()) {
        Some(explicit) => Some(explicit),
        None => {
            let recipients = state.user_repo.list_report_recipients(&company.id).await?;
            let emails: Vec<String> = recipients.into_iter().map(|u| u.email).collect();
            if emails.is_empty() { None } else { Some(emails.join(",")) }
        }
    };

    let request = ReportRequest::new(
        company.id.clone(),
        payload.date_start.clone(),
        payload.date_end.clone(),
        email_to,
        "pending",
    );
    let request = state.request_repo.create(&request).await?;

    let service = state.report_service.clone();
    let spawned_request = request.clone();
    tokio::spawn(async move {
        service
            .run(
                &spawned_request.id,
                &company,
                &spawned_request.date_start,
                spawned_request.date_end.as_deref(),
                spawned_request.email_to.as_deref(),
            )
            .await;
    });

    info!("Request {} created for company {}", request.id, request.company_id);
    Ok(Json(request))
}

pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
) -> Result<impl IntoResponse, AppError> {
    let requests = state.request_repo.list_by_company(&company_id, 100).await?;
    Ok(Json(requests))
}

pub async fn get_request(
    State(state): State<Arc<AppState>>,
    _auth: ApiAuth,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;
    Ok(Json(request))
}

pub async fn get_request_logs(
    State(state): State<Arc<AppState>>,
    _auth: ApiAuth,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    Ok(Json(RequestLogsResponse {
        request_logs: state.request_repo.list_request_logs(&request_id).await?,
        email_logs: state.request_repo.list_email_logs(&request_id).await?,
    }))
}

/// Open diagnostic endpoint: shows the exact payload that would go to the
/// company's ticket API for the given range, without calling anything.
pub async fn test_payload(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FetchTicketsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let company = state.company_repo.find_by_id(&payload.company_id).await?
        .ok_or(AppError::NotFound("Company not found".into()))?;

    let date_start_unix = dates::to_instant_ms(&payload.date_start, false)?;
    let date_end_unix = match payload.date_end.as_deref() {
        Some(end) => Some(dates::to_instant_ms(end, true)?),
        None => None,
    };

    let query = TicketQuery::helpdesk(&company.api_key, date_start_unix, date_end_unix);

    Ok(Json(serde_json::json!({
        "company": company.name,
        "date_start_input": payload.date_start,
        "date_end_input": payload.date_end,
        "date_start_unix": date_start_unix,
        "date_end_unix": date_end_unix,
        "date_start_readable": format::format_instant(date_start_unix),
        "date_end_readable": date_end_unix.map(format::format_instant),
        "payload_sent": query,
    })))
}

/// Re-reads every active schedule and rebuilds the trigger registry.
pub async fn reload_scheduler(
    State(state): State<Arc<AppState>>,
    _auth: ApiAuth,
) -> Result<impl IntoResponse, AppError> {
    let registered = state.schedule_engine.load_all().await?;
    Ok(Json(MessageResponse::ok(format!("Schedules reloaded: {} registered", registered))))
}
