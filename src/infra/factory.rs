use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tera::Tera;
use tracing::log::LevelFilter;
use tracing::{error, info};

use crate::config::Config;
use crate::domain::models::system_config::SystemConfig;
use crate::domain::ports::SystemConfigRepository;
use crate::domain::services::report_service::ReportService;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::notify::webhook_notifier::WebhookNotifier;
use crate::infra::repositories::{
    sqlite_company_repo::SqliteCompanyRepo, sqlite_config_repo::SqliteConfigRepo,
    sqlite_request_repo::SqliteRequestRepo, sqlite_schedule_repo::SqliteScheduleRepo,
    sqlite_user_repo::SqliteUserRepo,
};
use crate::infra::tickets::http_ticket_api::HttpTicketApi;
use crate::scheduler::ScheduleEngine;
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_sqlite_migrations(&pool).await;

    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    let mut tera = Tera::default();
    tera.add_raw_template("report_email.txt", include_str!("../templates/report_email.txt"))
        .expect("Failed to load report email template");
    let templates = Arc::new(tera);

    let company_repo = Arc::new(SqliteCompanyRepo::new(pool.clone()));
    let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
    let schedule_repo = Arc::new(SqliteScheduleRepo::new(pool.clone()));
    let request_repo = Arc::new(SqliteRequestRepo::new(pool.clone()));
    let config_repo = Arc::new(SqliteConfigRepo::new(pool.clone()));

    seed_system_config(config_repo.as_ref(), config).await;

    let ticket_api = Arc::new(HttpTicketApi::new(config.api_timeout_secs));
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let notifier = Arc::new(WebhookNotifier::new(config.notify_webhook_url.clone()));

    let report_service = Arc::new(ReportService::new(
        request_repo.clone(),
        ticket_api.clone(),
        email_service.clone(),
        notifier.clone(),
        templates.clone(),
        config.upload_dir.clone(),
        config.response_truncate,
    ));

    let schedule_engine = Arc::new(ScheduleEngine::new(
        schedule_repo.clone(),
        company_repo.clone(),
        user_repo.clone(),
        request_repo.clone(),
        report_service.clone(),
        config.scheduler_tick_secs,
    ));

    AppState {
        config: config.clone(),
        company_repo,
        user_repo,
        schedule_repo,
        request_repo,
        config_repo,
        ticket_api,
        email_service,
        notifier,
        report_service,
        schedule_engine,
        templates,
    }
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

/// Seeds default runtime settings on first start.
async fn seed_system_config(repo: &dyn SystemConfigRepository, config: &Config) {
    match repo.count().await {
        Ok(0) => {
            let defaults = [
                SystemConfig::new("smtp_enabled".to_string(), "true".to_string()),
                SystemConfig::new(
                    "max_date_range_days".to_string(),
                    config.max_date_range_days.to_string(),
                ),
            ];
            for entry in defaults {
                if let Err(e) = repo.upsert(&entry).await {
                    error!(key = %entry.config_key, error = %e, "Failed to seed system config");
                }
            }
            info!("Seeded default system config");
        }
        Ok(_) => {}
        Err(e) => error!(error = %e, "Failed to check system config table"),
    }
}
