use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The closed set of reporting windows a schedule can produce.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReportType {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ReportSchedule {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub description: Option<String>,
    pub report_type: ReportType,
    pub cron_expression: Option<String>,
    /// Only consulted when `report_type` is `custom`.
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    /// Comma-joined override; falls back to all subscribed company users.
    pub recipients: Option<String>,
    pub is_active: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub run_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportSchedule {
    pub fn new(company_id: String, name: String, report_type: ReportType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            company_id,
            name,
            description: None,
            report_type,
            cron_expression: None,
            date_start: None,
            date_end: None,
            recipients: None,
            is_active: true,
            last_run: None,
            run_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
