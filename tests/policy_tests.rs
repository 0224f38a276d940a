mod common;

use std::collections::HashSet;

use axum::http::{Method, StatusCode};
use bson::oid::ObjectId;
use scholar_stream::{
    models::Role,
    policy::{Access, ROUTE_POLICIES, lookup},
    repository::Repository,
};

use common::{ADMIN, MODERATOR, STUDENT, TestApp};

// --- Route table ---

#[test]
fn lookup_accepts_prefixed_and_relative_templates() {
    assert_eq!(
        lookup(&Method::GET, "/api/v1/users/{id}"),
        Some(Access::Authenticated)
    );
    assert_eq!(lookup(&Method::GET, "/users/{id}"), Some(Access::Authenticated));
    assert_eq!(lookup(&Method::DELETE, "/users/{id}"), Some(Access::AdminOnly));
    assert_eq!(lookup(&Method::GET, "/scholarships"), Some(Access::Public));
    assert_eq!(
        lookup(&Method::PATCH, "/applications/{id}/status"),
        Some(Access::ModeratorOrAdmin)
    );
}

#[test]
fn lookup_misses_unknown_routes_and_verbs() {
    assert_eq!(lookup(&Method::PUT, "/users/{id}"), None);
    assert_eq!(lookup(&Method::GET, "/internal/debug"), None);
    assert_eq!(lookup(&Method::POST, "/analytics/stats"), None);
}

#[test]
fn route_table_has_no_duplicate_entries() {
    let mut seen = HashSet::new();
    for (verb, path, _) in ROUTE_POLICIES {
        assert!(seen.insert((*verb, *path)), "duplicate policy for {verb:?} {path}");
    }
}

#[test]
fn every_analytics_route_is_admin_only() {
    let analytics: Vec<_> = ROUTE_POLICIES
        .iter()
        .filter(|(_, path, _)| path.starts_with("/analytics"))
        .collect();
    assert_eq!(analytics.len(), 5);
    assert!(analytics.iter().all(|(_, _, access)| *access == Access::AdminOnly));
}

#[test]
fn access_predicates() {
    use Role::{Admin, Moderator, Student};

    assert!(Access::Public.permits(None));
    assert!(Access::Authenticated.permits(None));
    assert!(Access::Authenticated.permits(Some(Student)));

    assert!(!Access::ModeratorOrAdmin.permits(None));
    assert!(!Access::ModeratorOrAdmin.permits(Some(Student)));
    assert!(Access::ModeratorOrAdmin.permits(Some(Moderator)));
    assert!(Access::ModeratorOrAdmin.permits(Some(Admin)));

    assert!(!Access::AdminOnly.permits(Some(Moderator)));
    assert!(Access::AdminOnly.permits(Some(Admin)));
}

// --- Enforcement through the router ---

#[tokio::test]
async fn public_routes_need_no_token() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/v1/scholarships", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn student_is_denied_admin_and_staff_routes() {
    let app = TestApp::with_accounts();

    let (status, body) = app.send(Method::GET, "/api/v1/users", Some(STUDENT), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Forbidden: admin access required");

    let (status, body) = app
        .send(Method::GET, "/api/v1/applications", Some(STUDENT), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden: moderator or admin access required");
}

#[tokio::test]
async fn moderator_reaches_staff_routes_but_not_admin_routes() {
    let app = TestApp::with_accounts();

    let (status, _) = app
        .send(Method::GET, "/api/v1/applications", Some(MODERATOR), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/api/v1/reviews", Some(MODERATOR), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::GET, "/api/v1/analytics/stats", Some(MODERATOR), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_reaches_everything() {
    let app = TestApp::with_accounts();

    for uri in [
        "/api/v1/users",
        "/api/v1/applications",
        "/api/v1/reviews",
        "/api/v1/analytics/stats",
        "/api/v1/analytics/applications-by-category",
    ] {
        let (status, _) = app.send(Method::GET, uri, Some(ADMIN), None).await;
        assert_eq!(status, StatusCode::OK, "admin denied {uri}");
    }
}

#[tokio::test]
async fn role_is_resolved_from_the_store_on_every_request() {
    let app = TestApp::with_accounts();

    let (status, _) = app.send(Method::GET, "/api/v1/users", Some(STUDENT), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The same token works once the stored role changes.
    let id = app.repo.user(STUDENT).unwrap().id;
    app.repo
        .set_user_role(ObjectId::parse_str(&id).unwrap(), Role::Admin)
        .await
        .unwrap();

    let (status, _) = app.send(Method::GET, "/api/v1/users", Some(STUDENT), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unregistered_token_is_not_staff() {
    let app = TestApp::new();
    let (status, _) = app
        .send(Method::GET, "/api/v1/reviews", Some("ghost@example.com"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
