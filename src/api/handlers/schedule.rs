use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::dtos::requests::{CreateScheduleRequest, UpdateScheduleRequest};
use crate::api::dtos::responses::MessageResponse;
use crate::api::extractors::{auth::ApiAuth, company::CompanyId};
use crate::domain::models::schedule::ReportSchedule;
use crate::error::AppError;
use crate::scheduler::parse_cron;
use crate::state::AppState;

pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(expr) = payload.cron_expression.as_deref() {
        parse_cron(expr)?;
    }

    let mut schedule = ReportSchedule::new(company_id, payload.name, payload.report_type);
    schedule.description = payload.description;
    schedule.cron_expression = payload.cron_expression;
    schedule.date_start = payload.date_start;
    schedule.date_end = payload.date_end;
    schedule.recipients = payload.recipients;
    if let Some(is_active) = payload.is_active {
        schedule.is_active = is_active;
    }

    let created = state.schedule_repo.create(&schedule).await?;
    state.schedule_engine.upsert(&created);

    info!("Schedule created: {} for company {}", created.id, created.company_id);
    Ok(Json(created))
}

pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
) -> Result<impl IntoResponse, AppError> {
    let schedules = state.schedule_repo.list_by_company(&company_id).await?;
    Ok(Json(schedules))
}

pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
    Path((_, schedule_id)): Path<(String, String)>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut schedule = find_company_schedule(&state, &company_id, &schedule_id).await?;

    if let Some(expr) = payload.cron_expression.as_deref() {
        parse_cron(expr)?;
    }

    if let Some(name) = payload.name {
        schedule.name = name;
    }
    if let Some(description) = payload.description {
        schedule.description = Some(description);
    }
    if let Some(report_type) = payload.report_type {
        schedule.report_type = report_type;
    }
    if let Some(cron_expression) = payload.cron_expression {
        schedule.cron_expression = Some(cron_expression);
    }
    if let Some(date_start) = payload.date_start {
        schedule.date_start = Some(date_start);
    }
    if let Some(date_end) = payload.date_end {
        schedule.date_end = Some(date_end);
    }
    if let Some(recipients) = payload.recipients {
        schedule.recipients = Some(recipients);
    }
    if let Some(is_active) = payload.is_active {
        schedule.is_active = is_active;
    }

    let updated = state.schedule_repo.update(&schedule).await?;
    state.schedule_engine.upsert(&updated);

    Ok(Json(updated))
}

pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
    Path((_, schedule_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let schedule = find_company_schedule(&state, &company_id, &schedule_id).await?;

    state.schedule_engine.remove(&schedule.id);
    state.schedule_repo.delete(&schedule.id).await?;

    info!("Schedule deleted: {}", schedule_id);
    Ok(Json(MessageResponse::ok("Schedule deleted")))
}

pub async fn trigger_schedule(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
    Path((_, schedule_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let schedule = find_company_schedule(&state, &company_id, &schedule_id).await?;

    let engine = state.schedule_engine.clone();
    tokio::spawn(async move {
        if let Err(e) = engine.fire(&schedule.id).await {
            error!(schedule_id = %schedule.id, error = %e, "Manually triggered schedule failed to start");
        }
    });

    Ok(Json(MessageResponse::ok("Schedule triggered")))
}

async fn find_company_schedule(
    state: &Arc<AppState>,
    company_id: &str,
    schedule_id: &str,
) -> Result<ReportSchedule, AppError> {
    let schedule = state.schedule_repo.find_by_id(schedule_id).await?
        .filter(|s| s.company_id == company_id)
        .ok_or(AppError::NotFound("Schedule not found".into()))?;
    Ok(schedule)
}
