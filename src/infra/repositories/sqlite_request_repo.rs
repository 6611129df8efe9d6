use crate::domain::models::request::{EmailLog, ReportRequest, RequestLog};
use crate::domain::ports::RequestRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteRequestRepo {
    pool: SqlitePool,
}

impl SqliteRequestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestRepository for SqliteRequestRepo {
    async fn create(&self, request: &ReportRequest) -> Result<ReportRequest, AppError> {
        sqlx::query_as::<_, ReportRequest>(
            "INSERT INTO ticket_requests (id, company_id, date_start, date_end, email_to, status, file_path, file_name, total_tickets, error_message, processing_time_seconds, created_at, completed_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&request.id)
            .bind(&request.company_id)
            .bind(&request.date_start)
            .bind(&request.date_end)
            .bind(&request.email_to)
            .bind(&request.status)
            .bind(&request.file_path)
            .bind(&request.file_name)
            .bind(request.total_tickets)
            .bind(&request.error_message)
            .bind(request.processing_time_seconds)
            .bind(request.created_at)
            .bind(request.completed_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ReportRequest>, AppError> {
        sqlx::query_as::<_, ReportRequest>("SELECT * FROM ticket_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_company(&self, company_id: &str, limit: i64) -> Result<Vec<ReportRequest>, AppError> {
        sqlx::query_as::<_, ReportRequest>(
            "SELECT * FROM ticket_requests WHERE company_id = ? ORDER BY created_at DESC LIMIT ?"
        )
            .bind(company_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_processing(&self, id: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE ticket_requests SET status = 'processing' WHERE id = ? AND status IN ('pending', 'scheduled')"
        )
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn set_output(&self, id: &str, file_path: &str, file_name: &str, total_tickets: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE ticket_requests SET file_path = ?, file_name = ?, total_tickets = ? WHERE id = ?"
        )
            .bind(file_path)
            .bind(file_name)
            .bind(total_tickets)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn complete(&self, id: &str, total_tickets: i64, elapsed_secs: i64) -> Result<(), AppError> {
        // Terminal states are immutable; the guard keeps a late writer from
        // resurrecting a finished request.
        sqlx::query(
            "UPDATE ticket_requests SET status = 'completed', total_tickets = ?, processing_time_seconds = ?, completed_at = ? WHERE id = ? AND status NOT IN ('completed', 'failed')"
        )
            .bind(total_tickets)
            .bind(elapsed_secs)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn fail(&self, id: &str, error_message: &str, elapsed_secs: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE ticket_requests SET status = 'failed', error_message = ?, processing_time_seconds = ?, completed_at = ? WHERE id = ? AND status NOT IN ('completed', 'failed')"
        )
            .bind(error_message)
            .bind(elapsed_secs)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn create_request_log(&self, log: &RequestLog) -> Result<RequestLog, AppError> {
        sqlx::query_as::<_, RequestLog>(
            "INSERT INTO request_logs (id, ticket_request_id, api_url, request_payload, response_status_code, response_data, request_duration_ms, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&log.id)
            .bind(&log.ticket_request_id)
            .bind(&log.api_url)
            .bind(&log.request_payload)
            .bind(log.response_status_code)
            .bind(&log.response_data)
            .bind(log.request_duration_ms)
            .bind(log.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn finish_request_log(&self, id: &str, status_code: i64, response_excerpt: &str, duration_ms: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE request_logs SET response_status_code = ?, response_data = ?, request_duration_ms = ? WHERE id = ?"
        )
            .bind(status_code)
            .bind(response_excerpt)
            .bind(duration_ms)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_request_logs(&self, request_id: &str) -> Result<Vec<RequestLog>, AppError> {
        sqlx::query_as::<_, RequestLog>(
            "SELECT * FROM request_logs WHERE ticket_request_id = ? ORDER BY created_at"
        )
            .bind(request_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_email_log(&self, log: &EmailLog) -> Result<EmailLog, AppError> {
        sqlx::query_as::<_, EmailLog>(
            "INSERT INTO email_logs (id, ticket_request_id, recipient_email, subject, status, error_message, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&log.id)
            .bind(&log.ticket_request_id)
            .bind(&log.recipient_email)
            .bind(&log.subject)
            .bind(&log.status)
            .bind(&log.error_message)
            .bind(log.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn finish_email_log(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError> {
        sqlx::query("UPDATE email_logs SET status = ?, error_message = ? WHERE id = ?")
            .bind(status)
            .bind(error_message)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_email_logs(&self, request_id: &str) -> Result<Vec<EmailLog>, AppError> {
        sqlx::query_as::<_, EmailLog>(
            "SELECT * FROM email_logs WHERE ticket_request_id = ? ORDER BY created_at"
        )
            .bind(request_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
