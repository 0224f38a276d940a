use axum::{Router, routing::get};

use crate::{AppState, handlers::scholarships};

/// Scholarship Router
///
/// Reads are public; writes are Admin-only.
pub fn scholarship_routes() -> Router<AppState> {
    Router::new()
        // GET /scholarships?search=&country=&category=&sortBy=&sortOrder=&page=&limit=
        .route(
            "/scholarships",
            get(scholarships::list_scholarships).post(scholarships::create_scholarship),
        )
        // GET /scholarships/top
        // The six cheapest listings, for the landing page.
        .route("/scholarships/top", get(scholarships::top_scholarships))
        // GET /scholarships/category/{category}?excludeId=
        .route(
            "/scholarships/category/{category}",
            get(scholarships::scholarships_by_category),
        )
        .route(
            "/scholarships/{id}",
            get(scholarships::get_scholarship)
                .patch(scholarships::update_scholarship)
                .delete(scholarships::delete_scholarship),
        )
}
