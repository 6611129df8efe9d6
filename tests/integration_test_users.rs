mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_add_and_list_users() {
    let app = TestApp::new().await;
    let company_id = app.create_company("Acme").await;

    let res = app
        .post_json(
            &format!("/api/v1/companies/{}/users", company_id),
            json!({"email": "ops@acme.com", "name": "Ops Team", "role": "manager"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let user = parse_body(res).await;
    assert_eq!(user["email"], "ops@acme.com");
    assert_eq!(user["receive_reports"], true);

    let res = app.get(&format!("/api/v1/companies/{}/users", company_id)).await;
    let users = parse_body(res).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_email_per_company_conflicts() {
    let app = TestApp::new().await;
    let company_id = app.create_company("Acme").await;

    let uri = format!("/api/v1/companies/{}/users", company_id);
    let res = app.post_json(&uri, json!({"email": "a@acme.com"})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.post_json(&uri, json!({"email": "a@acme.com"})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The same address under another company is fine.
    let other_id = app.create_company("Other").await;
    let res = app
        .post_json(
            &format!("/api/v1/companies/{}/users", other_id),
            json!({"email": "a@acme.com"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_users_under_unknown_company_404() {
    let app = TestApp::new().await;
    let res = app
        .post_json("/api/v1/companies/missing/users", json!({"email": "x@y.com"}))
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let app = TestApp::new().await;
    let company_id = app.create_company("Acme").await;

    let res = app
        .post_json(
            &format!("/api/v1/companies/{}/users", company_id),
            json!({"email": "a@acme.com"}),
        )
        .await;
    let user = parse_body(res).await;
    let user_id = user["id"].as_str().unwrap();

    let res = app
        .put_json(
            &format!("/api/v1/companies/{}/users/{}", company_id, user_id),
            json!({"receive_reports": false, "role": "viewer"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["receive_reports"], false);
    assert_eq!(updated["role"], "viewer");

    let res = app
        .delete(&format!("/api/v1/companies/{}/users/{}", company_id, user_id))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/companies/{}/users", company_id)).await;
    let users = parse_body(res).await;
    assert_eq!(users.as_array().unwrap().len(), 0);
}
