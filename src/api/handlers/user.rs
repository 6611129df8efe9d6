use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateUserRequest, UpdateUserRequest};
use crate::api::dtos::responses::MessageResponse;
use crate::api::extractors::{auth::ApiAuth, company::CompanyId};
use crate::domain::models::user::CompanyUser;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.user_repo.find_by_email(&company_id, &payload.email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let mut user = CompanyUser::new(company_id, payload.email);
    user.name = payload.name;
    user.role = payload.role;
    if let Some(receive_reports) = payload.receive_reports {
        user.receive_reports = receive_reports;
    }

    let created = state.user_repo.create(&user).await?;
    info!("Added user {} to company {}", created.email, created.company_id);
    Ok(Json(created))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list_by_company(&company_id).await?;
    Ok(Json(users))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
    Path((_, user_id)): Path<(String, String)>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut user = state.user_repo.find_by_id(&company_id, &user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if let Some(email) = payload.email {
        user.email = email;
    }
    if let Some(name) = payload.name {
        user.name = Some(name);
    }
    if let Some(role) = payload.role {
        user.role = Some(role);
    }
    if let Some(receive_reports) = payload.receive_reports {
        user.receive_reports = receive_reports;
    }
    if let Some(is_active) = payload.is_active {
        user.is_active = is_active;
    }

    let updated = state.user_repo.update(&user).await?;
    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    _auth: ApiAuth,
    Path((_, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&company_id, &user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    state.user_repo.delete(&company_id, &user.id).await?;
    info!("Deleted user {}", user_id);
    Ok(Json(MessageResponse::ok("User deleted")))
}
