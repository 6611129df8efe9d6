use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tera::{Context, Tera};
use tracing::{error, info, warn};

use crate::domain::models::company::Company;
use crate::domain::models::request::{EmailLog, RequestLog};
use crate::domain::models::ticket::{TicketQuery, TicketRecord};
use crate::domain::ports::{EmailService, Notifier, RequestRepository, Severity, TicketApi};
use crate::domain::services::{dates, naming, tabulate};
use crate::error::AppError;

/// Runs the full report pipeline for one request: fetch tickets from the
/// company's helpdesk API, tabulate them into a CSV, deliver to the
/// recipients, and keep the request's lifecycle record honest throughout.
pub struct ReportService {
    request_repo: Arc<dyn RequestRepository>,
    ticket_api: Arc<dyn TicketApi>,
    email_service: Arc<dyn EmailService>,
    notifier: Arc<dyn Notifier>,
    templates: Arc<Tera>,
    upload_dir: String,
    response_truncate: usize,
}

impl ReportService {
    pub fn new(
        request_repo: Arc<dyn RequestRepository>,
        ticket_api: Arc<dyn TicketApi>,
        email_service: Arc<dyn EmailService>,
        notifier: Arc<dyn Notifier>,
        templates: Arc<Tera>,
        upload_dir: String,
        response_truncate: usize,
    ) -> Self {
        Self {
            request_repo,
            ticket_api,
            email_service,
            notifier,
            templates,
            upload_dir,
            response_truncate,
        }
    }

    /// Entry point for both HTTP-triggered and scheduled requests. Every
    /// pipeline failure is captured here and persisted onto the request;
    /// the caller always observes a terminal status by polling, never an
    /// unhandled fault.
    pub async fn run(
        &self,
        request_id: &str,
        company: &Company,
        date_start: &str,
        date_end: Option<&str>,
        email_to: Option<&str>,
    ) {
        let started = Instant::now();

        if let Err(e) = self
            .execute(request_id, company, date_start, date_end, email_to, &started)
            .await
        {
            let elapsed = started.elapsed().as_secs() as i64;
            error!(request_id, error = %e, "Report request failed");
            if let Err(db_err) = self.request_repo.fail(request_id, &e.to_string(), elapsed).await {
                error!(request_id, error = %db_err, "Failed to persist failure status");
            }
        }
    }

    async fn execute(
        &self,
        request_id: &str,
        company: &Company,
        date_start: &str,
        date_end: Option<&str>,
        email_to: Option<&str>,
        started: &Instant,
    ) -> Result<(), AppError> {
        self.request_repo.set_processing(request_id).await?;

        let tickets = self
            .fetch_tickets(request_id, company, date_start, date_end)
            .await?;

        if tickets.is_empty() {
            let elapsed = started.elapsed().as_secs() as i64;
            self.request_repo.complete(request_id, 0, elapsed).await?;
            info!(request_id, company = %company.name, "No tickets found");
            return Ok(());
        }

        let table = tabulate::tabulate(&tickets, Utc::now());
        let file_name = naming::build_filename(&company.name, date_start, date_end);
        let file_path = Path::new(&self.upload_dir).join(&file_name);
        tabulate::write_csv(&table, &file_path)?;
        let file_path = file_path.to_string_lossy().to_string();

        self.request_repo
            .set_output(request_id, &file_path, &file_name, tickets.len() as i64)
            .await?;

        if let Some(recipients) = email_to {
            self.deliver(
                request_id, company, recipients, &file_path, &file_name,
                tickets.len(), date_start, date_end, started,
            )
            .await?;
        }

        let elapsed = started.elapsed().as_secs() as i64;
        self.request_repo
            .complete(request_id, tickets.len() as i64, elapsed)
            .await?;
        info!(
            request_id,
            company = %company.name,
            tickets = tickets.len(),
            elapsed,
            "Report request completed"
        );
        Ok(())
    }

    /// Calls the company's ticket API with the fixed-shape payload,
    /// bracketing the call with a request log entry. A non-2xx status is
    /// an upstream error; an empty body is a valid zero-ticket result.
    async fn fetch_tickets(
        &self,
        request_id: &str,
        company: &Company,
        date_start: &str,
        date_end: Option<&str>,
    ) -> Result<Vec<TicketRecord>, AppError> {
        let start_ms = dates::to_instant_ms(date_start, false)?;
        let end_ms = match date_end {
            Some(d) => Some(dates::to_instant_ms(d, true)?),
            None => None,
        };

        let payload = TicketQuery::helpdesk(&company.api_key, start_ms, end_ms);
        let payload_json = serde_json::to_string(&payload)
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to serialize payload: {}", e)))?;

        info!(request_id, start_ms, end_ms = ?end_ms, url = %company.api_url, "Calling ticket API");

        let log = RequestLog::new(request_id.to_string(), company.api_url.clone(), payload_json);
        let log = self.request_repo.create_request_log(&log).await?;

        let response = self.ticket_api.fetch(&company.api_url, &payload).await?;

        let excerpt = truncate_response(&response.body, self.response_truncate);
        self.request_repo
            .finish_request_log(&log.id, response.status as i64, &excerpt, response.duration_ms)
            .await?;

        if !(200..300).contains(&response.status) {
            return Err(AppError::Upstream { status: response.status });
        }

        let body = response.body.trim();
        if body.is_empty() || body == "null" || body == "[]" {
            return Ok(Vec::new());
        }

        let tickets: Vec<TicketRecord> = serde_json::from_str(body).map_err(|e| {
            AppError::InternalWithMsg(format!("Unexpected ticket API response shape: {}", e))
        })?;

        info!(request_id, count = tickets.len(), "Ticket API returned tickets");
        Ok(tickets)
    }

    /// Emails the report to each recipient independently, logging every
    /// attempt; one failed send never aborts the rest. Finishes with a
    /// best-effort summary notification that can never fail the request.
    #[allow(clippy::too_many_arguments)]
    async fn deliver(
        &self,
        request_id: &str,
        company: &Company,
        recipients: &str,
        file_path: &str,
        file_name: &str,
        total_tickets: usize,
        date_start: &str,
        date_end: Option<&str>,
        started: &Instant,
    ) -> Result<(), AppError> {
        let attachment = tokio::fs::read(file_path)
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to read report file: {}", e)))?;

        let subject = format!("Tickets Report - {}", company.name);
        let range_end = date_end.unwrap_or("present");

        let mut context = Context::new();
        context.insert("company_name", &company.name);
        context.insert("date_start", date_start);
        context.insert("date_end", range_end);
        context.insert("total_tickets", &total_tickets);
        context.insert("processing_seconds", &started.elapsed().as_secs());
        context.insert("generated_at", &Utc::now().format("%Y-%m-%d %H:%M:%S").to_string());

        let body = self
            .templates
            .render("report_email.txt", &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {}", e)))?;

        for recipient in recipients.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            let log = EmailLog::new(request_id.to_string(), recipient.to_string(), subject.clone());
            let log = self.request_repo.create_email_log(&log).await?;

            match self
                .email_service
                .send(recipient, &subject, &body, Some(file_name), Some(&attachment))
                .await
            {
                Ok(()) => {
                    self.request_repo.finish_email_log(&log.id, "sent", None).await?;
                    info!(request_id, recipient, "Report email sent");
                }
                Err(e) => {
                    warn!(request_id, recipient, error = %e, "Report email failed");
                    self.request_repo
                        .finish_email_log(&log.id, "failed", Some(e.to_string()))
                        .await?;
                }
            }
        }

        let summary = format!(
            "Report for {}: {} tickets ({} to {}) in {}s, recipients: {}",
            company.name,
            total_tickets,
            date_start,
            range_end,
            started.elapsed().as_secs(),
            recipients
        );
        if let Err(e) = self.notifier.send(&summary, Severity::Info).await {
            warn!(request_id, error = %e, "Summary notification failed");
        }

        Ok(())
    }
}

/// Caps the stored response body at `limit` characters, marking the cut.
fn truncate_response(body: &str, limit: usize) -> String {
    if body.chars().count() > limit {
        let truncated: String = body.chars().take(limit).collect();
        format!("{}...", truncated)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_response;

    #[test]
    fn truncation_marks_the_cut() {
        assert_eq!(truncate_response("short", 100), "short");
        assert_eq!(truncate_response("abcdef", 3), "abc...");
        // Exactly at the limit is left alone.
        assert_eq!(truncate_response("abc", 3), "abc");
    }
}
