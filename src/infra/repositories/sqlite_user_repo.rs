use crate::domain::{models::user::CompanyUser, ports::CompanyUserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyUserRepository for SqliteUserRepo {
    async fn create(&self, user: &CompanyUser) -> Result<CompanyUser, AppError> {
        sqlx::query_as::<_, CompanyUser>(
            "INSERT INTO company_users (id, company_id, email, name, role, receive_reports, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&user.id)
            .bind(&user.company_id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.role)
            .bind(user.receive_reports)
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, company_id: &str, id: &str) -> Result<Option<CompanyUser>, AppError> {
        sqlx::query_as::<_, CompanyUser>(
            "SELECT * FROM company_users WHERE company_id = ? AND id = ?"
        )
            .bind(company_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, company_id: &str, email: &str) -> Result<Option<CompanyUser>, AppError> {
        sqlx::query_as::<_, CompanyUser>(
            "SELECT * FROM company_users WHERE company_id = ? AND email = ?"
        )
            .bind(company_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_company(&self, company_id: &str) -> Result<Vec<CompanyUser>, AppError> {
        sqlx::query_as::<_, CompanyUser>(
            "SELECT * FROM company_users WHERE company_id = ? ORDER BY email"
        )
            .bind(company_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_report_recipients(&self, company_id: &str) -> Result<Vec<CompanyUser>, AppError> {
        sqlx::query_as::<_, CompanyUser>(
            "SELECT * FROM company_users WHERE company_id = ? AND receive_reports = TRUE AND is_active = TRUE ORDER BY email"
        )
            .bind(company_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, user: &CompanyUser) -> Result<CompanyUser, AppError> {
        sqlx::query_as::<_, CompanyUser>(
            "UPDATE company_users SET email=?, name=?, role=?, receive_reports=?, is_active=?, updated_at=? WHERE company_id=? AND id=? RETURNING *"
        )
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.role)
            .bind(user.receive_reports)
            .bind(user.is_active)
            .bind(Utc::now())
            .bind(&user.company_id)
            .bind(&user.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, company_id: &str, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM company_users WHERE company_id = ? AND id = ?")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
