use axum::{
    Router,
    routing::{get, patch},
};

use crate::{AppState, handlers::applications};

/// Application Router
///
/// Students file and manage their own applications; Moderators and Admins
/// review them. Ownership and pending-only rules live in the handlers.
pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            get(applications::all_applications).post(applications::create_application),
        )
        // GET /applications/user/{email}
        // The caller's own applications.
        .route(
            "/applications/user/{email}",
            get(applications::my_applications),
        )
        // PATCH | DELETE /applications/{id}
        // Owner only, while the application is still pending.
        .route(
            "/applications/{id}",
            patch(applications::update_application).delete(applications::delete_application),
        )
        .route(
            "/applications/{id}/status",
            patch(applications::update_application_status),
        )
        .route(
            "/applications/{id}/feedback",
            patch(applications::add_feedback),
        )
        .route(
            "/applications/{id}/payment",
            patch(applications::update_payment_status),
        )
}
