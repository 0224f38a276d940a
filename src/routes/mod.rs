use axum::{Router, routing::post};

use crate::{AppState, handlers};

pub mod analytics;
pub mod applications;
pub mod payments;
pub mod reviews;
pub mod scholarships;
pub mod users;

/// api_routes
///
/// Every route served under `/api/v1`. None of these routers check access
/// themselves; `create_router` wraps the merged router in `policy::authorize`,
/// which consults `policy::ROUTE_POLICIES` for each matched route.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // POST /auth/jwt
        // Exchanges a verified email for the API bearer token.
        .route("/auth/jwt", post(handlers::auth::issue_jwt))
        .merge(users::user_routes())
        .merge(scholarships::scholarship_routes())
        .merge(applications::application_routes())
        .merge(reviews::review_routes())
        .merge(payments::payment_routes())
        .merge(analytics::analytics_routes())
}
