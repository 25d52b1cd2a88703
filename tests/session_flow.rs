//! Login, logout and session probe against a mock backend.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

use common::*;

fn login_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const CREDENTIALS: &str = r#"{"email":"owner@shop.test","password":"hunter22"}"#;

#[tokio::test]
async fn test_login_stores_token_cookie() {
    let backend = start_fixed_backend(
        200,
        r#"{"success":true,"data":{"accessToken":"jwt.abc.def","user":{"id":7}}}"#,
    )
    .await;
    let gateway = gateway(Some(backend.base_url()));

    let response = send(&gateway, login_request(CREDENTIALS)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response).expect("login sets a cookie");
    assert!(cookie.starts_with("token=jwt.abc.def"), "cookie: {}", cookie);
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(!cookie.contains("Secure"), "development cookies are not Secure");

    let body = body_json(response).await;
    assert_eq!(body, json!({"success": true, "message": "Login successful"}));

    let seen = backend.last();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, "/auth/login");
    assert_eq!(
        seen.body_json(),
        json!({"email": "owner@shop.test", "password": "hunter22"})
    );
}

#[tokio::test]
async fn test_production_cookie_is_secure() {
    let backend = start_fixed_backend(200, r#"{"data":{"accessToken":"jwt.prod"}}"#).await;
    let mut config = config_for(Some(backend.base_url()));
    config.environment = plenti_gateway::config::Environment::Production;
    let gateway = plenti_gateway::HttpServer::new(config).router();

    let response = send(&gateway, login_request(CREDENTIALS)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).unwrap().contains("Secure"));
}

#[tokio::test]
async fn test_login_without_token_is_bad_gateway() {
    let backend = start_fixed_backend(200, r#"{"success":true,"data":{}}"#).await;
    let gateway = gateway(Some(backend.base_url()));

    let response = send(&gateway, login_request(CREDENTIALS)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(set_cookie(&response).is_none());
    assert_envelope(
        &body_json(response).await,
        "Invalid response from authentication server",
    );
}

#[tokio::test]
async fn test_login_rejection_is_relayed() {
    let backend = start_fixed_backend(401, r#"{"success":false,"message":"Invalid credentials"}"#).await;
    let gateway = gateway(Some(backend.base_url()));

    let response = send(&gateway, login_request(CREDENTIALS)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).is_none());
    assert_envelope(&body_json(response).await, "Invalid credentials");
}

#[tokio::test]
async fn test_login_rejection_without_message_uses_default() {
    let backend = start_fixed_backend(403, "forbidden").await;
    let gateway = gateway(Some(backend.base_url()));

    let response = send(&gateway, login_request(CREDENTIALS)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_envelope(&body_json(response).await, "Login failed");
}

#[tokio::test]
async fn test_login_unconfigured_backend() {
    let gateway = gateway(None);

    let response = send(&gateway, login_request(CREDENTIALS)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_envelope(&body_json(response).await, "API URL not configured");
}

#[tokio::test]
async fn test_login_unreachable_backend_hides_details() {
    let gateway = gateway(Some(unreachable_base_url().await));

    let response = send(&gateway, login_request(CREDENTIALS)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_envelope(&body_json(response).await, "Internal server error");
}

#[tokio::test]
async fn test_login_malformed_body() {
    let backend = start_fixed_backend(200, r#"{"data":{"accessToken":"x"}}"#).await;
    let gateway = gateway(Some(backend.base_url()));

    let response = send(&gateway, login_request("{not json")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_envelope(&body_json(response).await, "Internal server error");
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_oversized_login_body_is_enveloped() {
    let backend = start_fixed_backend(200, r#"{"data":{"accessToken":"x"}}"#).await;
    let gateway = gateway_with_body_limit(Some(backend.base_url()), 16);
    let oversized = format!(r#"{{"email":"{}","password":"x"}}"#, "a".repeat(80));

    // Streamed body: rejected while buffering in the handler.
    let response = send(&gateway, login_request(&oversized)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_envelope(&body_json(response).await, "Request body too large");

    // Declared length: rejected by the limit layer before routing.
    let declared = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, oversized.len())
        .body(Body::from(oversized.clone()))
        .unwrap();
    let response = send(&gateway, declared).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_envelope(&body_json(response).await, "Request body too large");

    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let gateway = gateway(None);

    for cookie in [Some("token=jwt.abc"), None, None] {
        let mut request = Request::builder().method("POST").uri("/api/auth/logout");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = send(&gateway, request.body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cleared = set_cookie(&response).expect("logout always expires the cookie");
        assert!(cleared.starts_with("token="));
        assert!(cleared.contains("Max-Age=0"));

        assert_eq!(
            body_json(response).await,
            json!({"success": true, "message": "Logged out successfully"})
        );
    }
}

#[tokio::test]
async fn test_session_probe() {
    let gateway = gateway(None);

    let anonymous = send(
        &gateway,
        Request::get("/api/auth/session").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::OK);
    assert_eq!(
        anonymous.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    assert_eq!(
        body_json(anonymous).await,
        json!({"success": true, "authenticated": false})
    );

    let signed_in = send(
        &gateway,
        Request::get("/api/auth/session")
            .header(header::COOKIE, "token=jwt.abc")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(
        body_json(signed_in).await,
        json!({"success": true, "authenticated": true})
    );
}
