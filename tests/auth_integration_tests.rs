mod common;

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use scholar_stream::{
    AppError,
    auth::{Caller, TOKEN_TTL_SECS, bearer_token, issue_token, verify_bearer, verify_token},
    models::Role,
};
use serde_json::json;

use common::{STUDENT, TestApp};

const SECRET: &str = "auth-test-secret";

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

fn assert_unauthorized(result: Result<impl std::fmt::Debug, AppError>) -> String {
    match result {
        Err(AppError::Unauthorized(message)) => message,
        other => panic!("expected 401, got {other:?}"),
    }
}

// --- Token Verifier ---

#[test]
fn issued_token_verifies_with_seven_day_lifetime() {
    let now = Utc::now();
    let token = issue_token(STUDENT, SECRET, now).unwrap();

    let claims = verify_token(&token, SECRET).unwrap();
    assert_eq!(claims.email, STUDENT);
    assert_eq!(claims.iat as i64, now.timestamp());
    assert_eq!((claims.exp - claims.iat) as i64, TOKEN_TTL_SECS);
}

#[test]
fn token_signed_with_another_secret_is_rejected() {
    let token = issue_token(STUDENT, "some-other-secret", Utc::now()).unwrap();
    let message = assert_unauthorized(verify_token(&token, SECRET));
    assert!(message.contains("invalid token"));
}

#[test]
fn expired_token_is_rejected() {
    let issued = Utc::now() - Duration::days(8);
    let token = issue_token(STUDENT, SECRET, issued).unwrap();
    let message = assert_unauthorized(verify_token(&token, SECRET));
    assert!(message.contains("expired"));
}

#[test]
fn garbage_token_is_rejected() {
    assert_unauthorized(verify_token("not.a.jwt", SECRET));
}

#[test]
fn bearer_header_shapes() {
    assert_unauthorized(bearer_token(&HeaderMap::new()));
    assert_unauthorized(bearer_token(&headers_with("Basic dXNlcjpwYXNz")));
    assert_unauthorized(bearer_token(&headers_with("Bearer ")));
    assert_eq!(bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
}

#[test]
fn verify_bearer_combines_extraction_and_verification() {
    let token = issue_token(STUDENT, SECRET, Utc::now()).unwrap();
    let claims = verify_bearer(&headers_with(&format!("Bearer {token}")), SECRET).unwrap();
    assert_eq!(claims.email, STUDENT);
}

#[test]
fn caller_role_helpers() {
    let admin = Caller {
        email: "a@example.com".to_string(),
        role: Some(Role::Admin),
    };
    let moderator = Caller {
        email: "m@example.com".to_string(),
        role: Some(Role::Moderator),
    };
    let unregistered = Caller {
        email: "new@example.com".to_string(),
        role: None,
    };

    assert!(admin.is_admin() && admin.is_staff());
    assert!(!moderator.is_admin() && moderator.is_staff());
    assert!(!unregistered.is_staff());
    assert!(unregistered.owns("new@example.com"));
    assert!(!unregistered.owns("a@example.com"));
}

// --- Through the router ---

#[tokio::test]
async fn jwt_endpoint_issues_a_verifiable_token() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/jwt",
            None,
            Some(json!({ "email": STUDENT })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let token = body["token"].as_str().unwrap();
    let claims = verify_token(token, &app.config.jwt_secret).unwrap();
    assert_eq!(claims.email, STUDENT);
}

#[tokio::test]
async fn jwt_endpoint_rejects_bad_email_and_bad_body() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::POST, "/api/v1/auth/jwt", None, Some(json!({ "email": "nobody" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .send(Method::POST, "/api/v1/auth/jwt", None, Some(json!({ "mail": STUDENT })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let app = TestApp::new();
    let uri = format!("/api/v1/applications/user/{STUDENT}");

    let (status, body) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unauthorized: no token provided");
}

#[tokio::test]
async fn protected_route_with_bad_tokens_is_401() {
    let app = TestApp::new();
    let uri = format!("/api/v1/applications/user/{STUDENT}");

    let forged = issue_token(STUDENT, "wrong-secret", Utc::now()).unwrap();
    let expired = issue_token(STUDENT, &app.config.jwt_secret, Utc::now() - Duration::days(30))
        .unwrap();

    for token in ["garbage", forged.as_str(), expired.as_str()] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(&uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send_request(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {token} was accepted");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn valid_token_without_user_record_reaches_authenticated_routes() {
    let app = TestApp::new();
    let uri = format!("/api/v1/applications/user/{STUDENT}");

    let (status, body) = app.send(Method::GET, &uri, Some(STUDENT), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}
