use serde::Deserialize;

use crate::domain::models::schedule::ReportType;

#[derive(Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub api_key: String,
    pub api_url: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListCompaniesQuery {
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub receive_reports: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub receive_reports: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateScheduleRequest {
    pub name: String,
    pub description: Option<String>,
    pub report_type: ReportType,
    pub cron_expression: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub recipients: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateScheduleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub report_type: Option<ReportType>,
    pub cron_expression: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub recipients: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct FetchTicketsRequest {
    pub company_id: String,
    pub date_start: String,
    pub date_end: Option<String>,
    pub email_to: Option<String>,
}
