use axum::{Router, routing::get};

use crate::{AppState, handlers::analytics};

/// Analytics Router
///
/// Admin dashboard views over the applications collection.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/stats", get(analytics::dashboard_stats))
        .route(
            "/analytics/applications-by-university",
            get(analytics::applications_by_university),
        )
        .route(
            "/analytics/applications-by-category",
            get(analytics::applications_by_category),
        )
        .route(
            "/analytics/applications-series",
            get(analytics::applications_series),
        )
        .route(
            "/analytics/top-scholarships",
            get(analytics::top_scholarships),
        )
}
