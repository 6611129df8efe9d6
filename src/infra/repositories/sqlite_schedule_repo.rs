use crate::domain::{models::schedule::ReportSchedule, ports::ScheduleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteScheduleRepo {
    pool: SqlitePool,
}

impl SqliteScheduleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepo {
    async fn create(&self, schedule: &ReportSchedule) -> Result<ReportSchedule, AppError> {
        sqlx::query_as::<_, ReportSchedule>(
            "INSERT INTO report_schedules (id, company_id, name, description, report_type, cron_expression, date_start, date_end, recipients, is_active, last_run, run_count, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&schedule.id)
            .bind(&schedule.company_id)
            .bind(&schedule.name)
            .bind(&schedule.description)
            .bind(schedule.report_type)
            .bind(&schedule.cron_expression)
            .bind(&schedule.date_start)
            .bind(&schedule.date_end)
            .bind(&schedule.recipients)
            .bind(schedule.is_active)
            .bind(schedule.last_run)
            .bind(schedule.run_count)
            .bind(schedule.created_at)
            .bind(schedule.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ReportSchedule>, AppError> {
        sqlx::query_as::<_, ReportSchedule>("SELECT * FROM report_schedules WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_company(&self, company_id: &str) -> Result<Vec<ReportSchedule>, AppError> {
        sqlx::query_as::<_, ReportSchedule>(
            "SELECT * FROM report_schedules WHERE company_id = ? ORDER BY created_at"
        )
            .bind(company_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self) -> Result<Vec<ReportSchedule>, AppError> {
        sqlx::query_as::<_, ReportSchedule>(
            "SELECT * FROM report_schedules WHERE is_active = TRUE"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, schedule: &ReportSchedule) -> Result<ReportSchedule, AppError> {
        sqlx::query_as::<_, ReportSchedule>(
            "UPDATE report_schedules SET name=?, description=?, report_type=?, cron_expression=?, date_start=?, date_end=?, recipients=?, is_active=?, updated_at=? WHERE id=? RETURNING *"
        )
            .bind(&schedule.name)
            .bind(&schedule.description)
            .bind(schedule.report_type)
            .bind(&schedule.cron_expression)
            .bind(&schedule.date_start)
            .bind(&schedule.date_end)
            .bind(&schedule.recipients)
            .bind(schedule.is_active)
            .bind(Utc::now())
            .bind(&schedule.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM report_schedules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn record_run(&self, id: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE report_schedules SET run_count = run_count + 1, last_run = ?, updated_at = ? WHERE id = ?"
        )
            .bind(Utc::now())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
