use reports_backend::{
    api::router::create_router,
    config::Config,
    domain::models::ticket::TicketQuery,
    domain::ports::{EmailService, Notifier, Severity, TicketApi, UpstreamResponse},
    domain::services::report_service::ReportService,
    error::AppError,
    infra::repositories::{
        sqlite_company_repo::SqliteCompanyRepo,
        sqlite_config_repo::SqliteConfigRepo,
        sqlite_request_repo::SqliteRequestRepo,
        sqlite_schedule_repo::SqliteScheduleRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    scheduler::ScheduleEngine,
    state::AppState,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use tera::Tera;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_TOKEN: &str = "test-api-token";

/// Programmable stand-in for the upstream helpdesk API.
pub struct MockTicketApi {
    response: Mutex<(u16, String)>,
}

#[allow(dead_code)]
impl MockTicketApi {
    pub fn new() -> Self {
        Self {
            response: Mutex::new((200, "[]".to_string())),
        }
    }

    pub fn set_response(&self, status: u16, body: &str) {
        *self.response.lock().unwrap() = (status, body.to_string());
    }
}

#[async_trait]
impl TicketApi for MockTicketApi {
    async fn fetch(&self, _api_url: &str, _payload: &TicketQuery) -> Result<UpstreamResponse, AppError> {
        let (status, body) = self.response.lock().unwrap().clone();
        Ok(UpstreamResponse {
            status,
            body,
            duration_ms: 5,
        })
    }
}

/// Records outgoing mail; can be told to fail for one recipient.
pub struct MockEmailService {
    pub sent: Mutex<Vec<String>>,
    pub fail_for: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl MockEmailService {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: Mutex::new(None),
        }
    }

    pub fn fail_for(&self, recipient: &str) {
        *self.fail_for.lock().unwrap() = Some(recipient.to_string());
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        recipient: &str,
        _subject: &str,
        _body: &str,
        _attachment_name: Option<&str>,
        _attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError> {
        if self.fail_for.lock().unwrap().as_deref() == Some(recipient) {
            return Err(AppError::Delivery("simulated send failure".to_string()));
        }
        self.sent.lock().unwrap().push(recipient.to_string());
        Ok(())
    }
}

pub struct MockNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, message: &str, _severity: Severity) -> Result<(), AppError> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub upload_dir: std::path::PathBuf,
    pub state: Arc<AppState>,
    pub ticket_api: Arc<MockTicketApi>,
    pub email_service: Arc<MockEmailService>,
    pub notifier: Arc<MockNotifier>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let upload_dir = std::env::temp_dir().join(format!("reports_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&upload_dir).expect("Failed to create test upload dir");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            api_token: TEST_TOKEN.to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            notify_webhook_url: None,
            upload_dir: upload_dir.to_string_lossy().to_string(),
            max_date_range_days: 365,
            api_timeout_secs: 5,
            response_truncate: 10000,
            scheduler_tick_secs: 3600,
        };

        let mut tera = Tera::default();
        tera.add_raw_template(
            "report_email.txt",
            "Report for {{ company_name }}: {{ total_tickets }} tickets ({{ date_start }} to {{ date_end }})",
        )
        .unwrap();
        let templates = Arc::new(tera);

        let company_repo = Arc::new(SqliteCompanyRepo::new(pool.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let schedule_repo = Arc::new(SqliteScheduleRepo::new(pool.clone()));
        let request_repo = Arc::new(SqliteRequestRepo::new(pool.clone()));
        let config_repo = Arc::new(SqliteConfigRepo::new(pool.clone()));

        let ticket_api = Arc::new(MockTicketApi::new());
        let email_service = Arc::new(MockEmailService::new());
        let notifier = Arc::new(MockNotifier::new());

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

        let state = Arc::new(AppState {
            config,
            company_repo,
            user_repo,
            schedule_repo,
            request_repo,
            config_repo,
            ticket_api: ticket_api.clone(),
            email_service: email_service.clone(),
            notifier: notifier.clone(),
            report_service,
            schedule_engine,
            templates,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            upload_dir,
            state,
            ticket_api,
            email_service,
            notifier,
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", TEST_TOKEN)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::AUTHORIZATION, self.bearer())
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::AUTHORIZATION, self.bearer())
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .header(header::AUTHORIZATION, self.bearer())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn delete(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(uri)
                    .header(header::AUTHORIZATION, self.bearer())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Creates a company through the API and returns its id.
    pub async fn create_company(&self, name: &str) -> String {
        let res = self
            .post_json(
                "/api/v1/companies",
                serde_json::json!({
                    "name": name,
                    "api_key": "test-key",
                    "api_url": "https://tickets.example.com/api"
                }),
            )
            .await;
        assert!(res.status().is_success(), "company creation failed: {}", res.status());
        let body = parse_body(res).await;
        body["id"].as_str().unwrap().to_string()
    }

    /// Polls until the request reaches `completed` or `failed`.
    pub async fn wait_for_terminal_status(&self, request_id: &str) -> Value {
        for _ in 0..200 {
            let res = self.get(&format!("/api/v1/requests/{}", request_id)).await;
            let body = parse_body(res).await;
            match body["status"].as_str() {
                Some("completed") | Some("failed") => return body,
                _ => tokio::time::sleep(Duration::from_millis(25)).await,
            }
        }
        panic!("request {} never reached a terminal status", request_id);
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
