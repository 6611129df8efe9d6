mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration, Utc};
use common::{parse_body, TestApp};
use serde_json::{json, Value};

async fn wait_for_request(app: &TestApp, company_id: &str) -> Value {
    for _ in 0..200 {
        let res = app.get(&format!("/api/v1/companies/{}/requests", company_id)).await;
        let requests = parse_body(res).await;
        if let Some(first) = requests.as_array().unwrap().first() {
            let status = first["status"].as_str().unwrap_or("");
            if status == "completed" || status == "failed" {
                return first.clone();
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    }
    panic!("no scheduled request reached a terminal status for {}", company_id);
}

#[tokio::test]
async fn test_manual_trigger_runs_a_scheduled_report() {
    let app = TestApp::new().await;
    let company_id = app.create_company("Acme").await;
    app.post_json(
        &format!("/api/v1/companies/{}/users", company_id),
        json!({"email": "reports@acme.com"}),
    )
    .await;
    app.ticket_api.set_response(200, "[]");

    let res = app
        .post_json(
            &format!("/api/v1/companies/{}/schedules", company_id),
            json!({"name": "Monthly", "report_type": "monthly", "cron_expression": "0 6 1 * *"}),
        )
        .await;
    let schedule = parse_body(res).await;
    let schedule_id = schedule["id"].as_str().unwrap().to_string();

    let res = app
        .post_json(
            &format!("/api/v1/companies/{}/schedules/{}/run", company_id, schedule_id),
            json!({}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let request = wait_for_request(&app, &company_id).await;
    assert_eq!(request["status"], "completed");
    assert_eq!(request["email_to"], "reports@acme.com");

    // The window is the full previous calendar month.
    let today = Utc::now().date_naive();
    let month_end = today.with_day(1).unwrap() - Duration::days(1);
    let month_start = month_end.with_day(1).unwrap();
    assert_eq!(request["date_start"], month_start.format("%Y-%m-%d").to_string());
    assert_eq!(
        request["date_end"],
        format!("{} 23:59:59", month_end.format("%Y-%m-%d"))
    );

    // The fire bumped the schedule's counters.
    let res = app.get(&format!("/api/v1/companies/{}/schedules", company_id)).await;
    let schedules = parse_body(res).await;
    assert_eq!(schedules[0]["run_count"], 1);
    assert!(schedules[0]["last_run"].is_string());
}

#[tokio::test]
async fn test_firing_an_inactive_schedule_is_a_no_op() {
    let app = TestApp::new().await;
    let company_id = app.create_company("Acme").await;

    let res = app
        .post_json(
            &format!("/api/v1/companies/{}/schedules", company_id),
            json!({
                "name": "Disabled",
                "report_type": "daily",
                "cron_expression": "0 7 * * *",
                "is_active": false
            }),
        )
        .await;
    let schedule = parse_body(res).await;
    let schedule_id = schedule["id"].as_str().unwrap().to_string();

    // Fire directly through the engine, as a timer tick would.
    app.state.schedule_engine.fire(&schedule_id).await.unwrap();

    let res = app.get(&format!("/api/v1/companies/{}/requests", company_id)).await;
    let requests = parse_body(res).await;
    assert_eq!(requests.as_array().unwrap().len(), 0);

    // Same silence for a schedule that no longer exists.
    app.state.schedule_engine.fire("no-such-schedule").await.unwrap();
}

#[tokio::test]
async fn test_recipient_override_beats_subscribed_users() {
    let app = TestApp::new().await;
    let company_id = app.create_company("Acme").await;
    app.post_json(
        &format!("/api/v1/companies/{}/users", company_id),
        json!({"email": "default@acme.com"}),
    )
    .await;
    app.ticket_api.set_response(200, "[]");

    let res = app
        .post_json(
            &format!("/api/v1/companies/{}/schedules", company_id),
            json!({
                "name": "Override",
                "report_type": "daily",
                "cron_expression": "0 7 * * *",
                "recipients": "boss@acme.com"
            }),
        )
        .await;
    let schedule = parse_body(res).await;
    let schedule_id = schedule["id"].as_str().unwrap().to_string();

    app.state.schedule_engine.fire(&schedule_id).await.unwrap();

    let request = wait_for_request(&app, &company_id).await;
    assert_eq!(request["email_to"], "boss@acme.com");
}

#[tokio::test]
async fn test_scheduler_reload_endpoint() {
    let app = TestApp::new().await;
    let company_id = app.create_company("Acme").await;

    let res = app
        .post_json(
            &format!("/api/v1/companies/{}/schedules", company_id),
            json!({"name": "Daily", "report_type": "daily", "cron_expression": "0 7 * * *"}),
        )
        .await;
    let schedule = parse_body(res).await;
    let schedule_id = schedule["id"].as_str().unwrap().to_string();

    // Simulate a cold start: wipe the registry, then reload from storage.
    app.state.schedule_engine.remove(&schedule_id);
    assert!(!app.state.schedule_engine.has_trigger(&schedule_id));

    let res = app.post_json("/api/v1/scheduler/reload", json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["success"], true);

    assert!(app.state.schedule_engine.has_trigger(&schedule_id));
}
