use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SystemConfig {
    pub id: String,
    pub config_key: String,
    pub config_value: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SystemConfig {
    pub fn new(config_key: String, config_value: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            config_key,
            config_value: Some(config_value),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}
