use axum::{
    Router,
    routing::{get, patch},
};

use crate::{AppState, handlers::reviews};

/// Review Router
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reviews",
            get(reviews::all_reviews).post(reviews::create_review),
        )
        // GET /reviews/scholarship/{id}
        // Public, newest first.
        .route(
            "/reviews/scholarship/{id}",
            get(reviews::reviews_for_scholarship),
        )
        .route("/reviews/user/{email}", get(reviews::my_reviews))
        .route(
            "/reviews/{id}",
            patch(reviews::update_review).delete(reviews::delete_review),
        )
}
