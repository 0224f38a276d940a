use axum::{
    Router,
    routing::{get, patch},
};

use crate::{AppState, handlers::users};

/// User Router
///
/// `{id}` is an email on GET and an ObjectId on PATCH/DELETE; the router needs
/// one parameter name per segment.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        // POST /users (public, create-or-touch on sign-in)
        // GET /users?role= (Admin)
        .route("/users", get(users::list_users).post(users::create_user))
        // GET /users/{email} (self) | PATCH (owner or Admin) | DELETE (Admin)
        .route(
            "/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // PATCH /users/{id}/role (Admin)
        .route("/users/{id}/role", patch(users::update_user_role))
}
