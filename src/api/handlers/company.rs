use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateCompanyRequest, ListCompaniesQuery, UpdateCompanyRequest};
use crate::api::dtos::responses::MessageResponse;
use crate::api::extractors::auth::ApiAuth;
use crate::domain::models::company::Company;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_company(
    State(state): State<Arc<AppState>>,
    _auth: ApiAuth,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.company_repo.find_by_name(&payload.name).await?.is_some() {
        return Err(AppError::Conflict("Company already exists".into()));
    }

    let mut company = Company::new(payload.name, payload.api_key, payload.api_url);
    company.description = payload.description;

    let created = state.company_repo.create(&company).await?;
    info!("Company created: {} ({})", created.name, created.id);
    Ok(Json(created))
}

pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    _auth: ApiAuth,
    Query(query): Query<ListCompaniesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let companies = state.company_repo.list(query.active.unwrap_or(true)).await?;
    Ok(Json(companies))
}

pub async fn get_company(
    State(state): State<Arc<AppState>>,
    _auth: ApiAuth,
    Path(company_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let company = state.company_repo.find_by_id(&company_id).await?
        .ok_or(AppError::NotFound("Company not found".into()))?;
    Ok(Json(company))
}

pub async fn update_company(
    State(state): State<Arc<AppState>>,
    _auth: ApiAuth,
    Path(company_id): Path<String>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut company = state.company_repo.find_by_id(&company_id).await?
        .ok_or(AppError::NotFound("Company not found".into()))?;

    if let Some(name) = payload.name {
        company.name = name;
    }
    if let Some(api_key) = payload.api_key {
        company.api_key = api_key;
    }
    if let Some(api_url) = payload.api_url {
        company.api_url = api_url;
    }
    if let Some(description) = payload.description {
        company.description = Some(description);
    }
    if let Some(is_active) = payload.is_active {
        company.is_active = is_active;
    }

    let updated = state.company_repo.update(&company).await?;
    info!("Company updated: {}", company_id);
    Ok(Json(updated))
}

pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    _auth: ApiAuth,
    Path(company_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let company = state.company_repo.find_by_id(&company_id).await?
        .ok_or(AppError::NotFound("Company not found".into()))?;

    state.company_repo.deactivate(&company.id).await?;
    info!("Company deactivated: {}", company.name);
    Ok(Json(MessageResponse::ok(format!("Deactivated {}", company.name))))
}
