use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One execution of the fetch → tabulate → deliver pipeline.
///
/// Lifecycle: `pending`/`scheduled` → `processing` → `completed` | `failed`.
/// Terminal rows are never mutated again.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ReportRequest {
    pub id: String,
    pub company_id: String,
    pub date_start: String,
    pub date_end: Option<String>,
    pub email_to: Option<String>,
    pub status: String,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub total_tickets: i64,
    pub error_message: Option<String>,
    pub processing_time_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ReportRequest {
    pub fn new(
        company_id: String,
        date_start: String,
        date_end: Option<String>,
        email_to: Option<String>,
        status: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            company_id,
            date_start,
            date_end,
            email_to,
            status: status.to_string(),
            file_path: None,
            file_name: None,
            total_tickets: 0,
            error_message: None,
            processing_time_seconds: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// One upstream API call, recorded before the request goes out and
/// completed right after the response lands. Append-only.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RequestLog {
    pub id: String,
    pub ticket_request_id: String,
    pub api_url: String,
    pub request_payload: Option<String>,
    pub response_status_code: Option<i64>,
    pub response_data: Option<String>,
    pub request_duration_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl RequestLog {
    pub fn new(ticket_request_id: String, api_url: String, request_payload: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_request_id,
            api_url,
            request_payload: Some(request_payload),
            response_status_code: None,
            response_data: None,
            request_duration_ms: None,
            created_at: Utc::now(),
        }
    }
}

/// One delivery attempt for one recipient: `sending` → `sent` | `failed`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EmailLog {
    pub id: String,
    pub ticket_request_id: String,
    pub recipient_email: String,
    pub subject: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EmailLog {
    pub fn new(ticket_request_id: String, recipient_email: String, subject: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_request_id,
            recipient_email,
            subject: Some(subject),
            status: "sending".to_string(),
            error_message: None,
            created_at: Utc::now(),
        }
    }
}
