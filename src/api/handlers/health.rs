use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::state::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = match state.company_repo.count().await {
        Ok(_) => "healthy",
        Err(_) => "degraded",
    };

    Json(serde_json::json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
