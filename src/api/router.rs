use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{company, health, request, schedule, user};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Companies
        .route("/api/v1/companies", post(company::create_company).get(company::list_companies))
        .route("/api/v1/companies/{company_id}", get(company::get_company).put(company::update_company).delete(company::delete_company))

        // Recipients
        .route("/api/v1/companies/{company_id}/users", post(user::create_user).get(user::list_users))
        .route("/api/v1/companies/{company_id}/users/{user_id}", put(user::update_user).delete(user::delete_user))

        // Schedules
        .route("/api/v1/companies/{company_id}/schedules", post(schedule::create_schedule).get(schedule::list_schedules))
        .route("/api/v1/companies/{company_id}/schedules/{schedule_id}", put(schedule::update_schedule).delete(schedule::delete_schedule))
        .route("/api/v1/companies/{company_id}/schedules/{schedule_id}/run", post(schedule::trigger_schedule))

        // Report requests
        .route("/api/v1/fetch-tickets", post(request::fetch_tickets))
        .route("/api/v1/companies/{company_id}/requests", get(request::list_requests))
        .route("/api/v1/requests/{request_id}", get(request::get_request))
        .route("/api/v1/requests/{request_id}/logs", get(request::get_request_logs))

        // Diagnostics
        .route("/api/v1/test-payload", post(request::test_payload))
        .route("/api/v1/scheduler/reload", post(request::reload_scheduler))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
