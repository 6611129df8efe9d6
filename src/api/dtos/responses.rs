use serde::Serialize;

use crate::domain::models::request::{EmailLog, RequestLog};

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}

#[derive(Serialize)]
pub struct RequestLogsResponse {
    pub request_logs: Vec<RequestLog>,
    pub email_logs: Vec<EmailLog>,
}
