mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{parse_body, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_and_get_company() {
    let app = TestApp::new().await;

    let res = app
        .post_json(
            "/api/v1/companies",
            json!({
                "name": "Acme Corp",
                "api_key": "secret-key",
                "api_url": "https://acme.example.com/api",
                "description": "First tenant"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let created = parse_body(res).await;
    assert_eq!(created["name"], "Acme Corp");
    assert_eq!(created["is_active"], true);
    // The API credential never leaves the service.
    assert!(created["api_key"].is_null());

    let id = created["id"].as_str().unwrap();
    let res = app.get(&format!("/api/v1/companies/{}", id)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = parse_body(res).await;
    assert_eq!(fetched["description"], "First tenant");
}

#[tokio::test]
async fn test_duplicate_company_name_conflicts() {
    let app = TestApp::new().await;
    app.create_company("Acme").await;

    let res = app
        .post_json(
            "/api/v1/companies",
            json!({"name": "Acme", "api_key": "k", "api_url": "https://x.example.com"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_mutating_endpoints_require_bearer_token() {
    let app = TestApp::new().await;

    // No Authorization header at all.
    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/companies")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"name": "X", "api_key": "k", "api_url": "https://x.example.com"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Wrong token.
    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/companies")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer wrong-token")
                .body(Body::from(
                    json!({"name": "X", "api_key": "k", "api_url": "https://x.example.com"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Health stays open.
    let res = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_deactivation_is_soft_and_filters_listing() {
    let app = TestApp::new().await;
    app.create_company("Keep Co").await;
    let drop = app.create_company("Drop Co").await;

    let res = app.delete(&format!("/api/v1/companies/{}", drop)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["success"], true);

    // Default listing hides deactivated tenants.
    let res = app.get("/api/v1/companies").await;
    let companies = parse_body(res).await;
    let names: Vec<&str> = companies
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Keep Co"]);

    // The row itself survives for history.
    let res = app.get("/api/v1/companies?active=false").await;
    let all = parse_body(res).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let res = app.get(&format!("/api/v1/companies/{}", drop)).await;
    let deactivated = parse_body(res).await;
    assert_eq!(deactivated["is_active"], false);
}

#[tokio::test]
async fn test_update_company_fields() {
    let app = TestApp::new().await;
    let id = app.create_company("Old Name").await;

    let res = app
        .put_json(
            &format!("/api/v1/companies/{}", id),
            json!({"name": "New Name", "api_url": "https://new.example.com"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["name"], "New Name");
    assert_eq!(updated["api_url"], "https://new.example.com");
}

#[tokio::test]
async fn test_get_unknown_company_is_404() {
    let app = TestApp::new().await;
    let res = app.get("/api/v1/companies/no-such-id").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
