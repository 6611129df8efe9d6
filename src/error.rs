use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid date format: {0}. Use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS")]
    InvalidDateFormat(String),
    #[error("End date/time must be after start date/time: {0}")]
    RangeOrder(String),
    #[error("Invalid cron expression: {0}. Use: minute hour day month day_of_week")]
    InvalidCron(String),
    #[error("Upstream API error: status {status}")]
    Upstream { status: u16 },
    #[error("Email delivery failed: {0}")]
    Delivery(String),
    #[error("Notification failed: {0}")]
    Notification(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidDateFormat(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::RangeOrder(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidCron(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Upstream { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Delivery(msg) => {
                error!("Delivery error surfaced to HTTP layer: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
            AppError::Notification(msg) => {
                error!("Notification error surfaced to HTTP layer: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
