use crate::domain::{models::system_config::SystemConfig, ports::SystemConfigRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteConfigRepo {
    pool: SqlitePool,
}

impl SqliteConfigRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SystemConfigRepository for SqliteConfigRepo {
    async fn upsert(&self, config: &SystemConfig) -> Result<SystemConfig, AppError> {
        sqlx::query_as::<_, SystemConfig>(
            "INSERT INTO system_config (id, config_key, config_value, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(config_key) DO UPDATE SET config_value = excluded.config_value, updated_at = ? RETURNING *"
        )
            .bind(&config.id)
            .bind(&config.config_key)
            .bind(&config.config_value)
            .bind(&config.description)
            .bind(config.created_at)
            .bind(config.updated_at)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn get(&self, key: &str) -> Result<Option<SystemConfig>, AppError> {
        sqlx::query_as::<_, SystemConfig>("SELECT * FROM system_config WHERE config_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<SystemConfig>, AppError> {
        sqlx::query_as::<_, SystemConfig>("SELECT * FROM system_config ORDER BY config_key")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM system_config")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
