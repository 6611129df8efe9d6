use crate::domain::models::{
    company::Company, request::{EmailLog, ReportRequest, RequestLog},
    schedule::ReportSchedule, system_config::SystemConfig,
    ticket::TicketQuery, user::CompanyUser,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create(&self, company: &Company) -> Result<Company, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, AppError>;
    async fn list(&self, active_only: bool) -> Result<Vec<Company>, AppError>;
    async fn update(&self, company: &Company) -> Result<Company, AppError>;
    async fn deactivate(&self, id: &str) -> Result<(), AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait CompanyUserRepository: Send + Sync {
    async fn create(&self, user: &CompanyUser) -> Result<CompanyUser, AppError>;
    async fn find_by_id(&self, company_id: &str, id: &str) -> Result<Option<CompanyUser>, AppError>;
    async fn find_by_email(&self, company_id: &str, email: &str) -> Result<Option<CompanyUser>, AppError>;
    async fn list_by_company(&self, company_id: &str) -> Result<Vec<CompanyUser>, AppError>;
    /// Active users subscribed to reports, i.e. the default recipient set.
    async fn list_report_recipients(&self, company_id: &str) -> Result<Vec<CompanyUser>, AppError>;
    async fn update(&self, user: &CompanyUser) -> Result<CompanyUser, AppError>;
    async fn delete(&self, company_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn create(&self, schedule: &ReportSchedule) -> Result<ReportSchedule, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ReportSchedule>, AppError>;
    async fn list_by_company(&self, company_id: &str) -> Result<Vec<ReportSchedule>, AppError>;
    async fn list_active(&self) -> Result<Vec<ReportSchedule>, AppError>;
    async fn update(&self, schedule: &ReportSchedule) -> Result<ReportSchedule, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Bumps `run_count` and stamps `last_run` after a fire.
    async fn record_run(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn create(&self, request: &ReportRequest) -> Result<ReportRequest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ReportRequest>, AppError>;
    async fn list_by_company(&self, company_id: &str, limit: i64) -> Result<Vec<ReportRequest>, AppError>;
    async fn set_processing(&self, id: &str) -> Result<(), AppError>;
    async fn set_output(&self, id: &str, file_path: &str, file_name: &str, total_tickets: i64) -> Result<(), AppError>;
    async fn complete(&self, id: &str, total_tickets: i64, elapsed_secs: i64) -> Result<(), AppError>;
    async fn fail(&self, id: &str, error_message: &str, elapsed_secs: i64) -> Result<(), AppError>;

    async fn create_request_log(&self, log: &RequestLog) -> Result<RequestLog, AppError>;
    async fn finish_request_log(&self, id: &str, status_code: i64, response_excerpt: &str, duration_ms: i64) -> Result<(), AppError>;
    async fn list_request_logs(&self, request_id: &str) -> Result<Vec<RequestLog>, AppError>;

    async fn create_email_log(&self, log: &EmailLog) -> Result<EmailLog, AppError>;
    async fn finish_email_log(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
    async fn list_email_logs(&self, request_id: &str) -> Result<Vec<EmailLog>, AppError>;
}

#[async_trait]
pub trait SystemConfigRepository: Send + Sync {
    async fn upsert(&self, config: &SystemConfig) -> Result<SystemConfig, AppError>;
    async fn get(&self, key: &str) -> Result<Option<SystemConfig>, AppError>;
    async fn list(&self) -> Result<Vec<SystemConfig>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

/// Raw outcome of one upstream call. The service layer decides what a
/// non-success status means; transport failures surface as errors.
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
    pub duration_ms: i64,
}

#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn fetch(&self, api_url: &str, payload: &TicketQuery) -> Result<UpstreamResponse, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        attachment_name: Option<&str>,
        attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Fire-and-forget summary channel. Callers log and discard failures;
/// nothing downstream may depend on delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str, severity: Severity) -> Result<(), AppError>;
}
