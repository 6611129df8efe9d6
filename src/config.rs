use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub api_token: String,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub notify_webhook_url: Option<String>,
    pub upload_dir: String,
    pub max_date_range_days: i64,
    pub api_timeout_secs: u64,
    pub response_truncate: usize,
    pub scheduler_tick_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            api_token: env::var("API_TOKEN").expect("API_TOKEN must be set"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL").ok(),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "/tmp".to_string()),
            max_date_range_days: env::var("MAX_DATE_RANGE_DAYS").unwrap_or_else(|_| "365".to_string()).parse().expect("MAX_DATE_RANGE_DAYS must be a number"),
            api_timeout_secs: env::var("API_TIMEOUT").unwrap_or_else(|_| "60".to_string()).parse().expect("API_TIMEOUT must be a number"),
            response_truncate: env::var("RESPONSE_TRUNCATE_LENGTH").unwrap_or_else(|_| "10000".to_string()).parse().expect("RESPONSE_TRUNCATE_LENGTH must be a number"),
            scheduler_tick_secs: env::var("SCHEDULER_TICK_SECS").unwrap_or_else(|_| "30".to_string()).parse().expect("SCHEDULER_TICK_SECS must be a number"),
        }
    }
}
