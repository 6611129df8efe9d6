use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A report recipient scoped to one company.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CompanyUser {
    pub id: String,
    pub company_id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub receive_reports: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyUser {
    pub fn new(company_id: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            company_id,
            email,
            name: None,
            role: None,
            receive_reports: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
