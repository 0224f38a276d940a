use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    auth::{Caller, verify_bearer},
    error::AppError,
    models::Role,
};

/// Prefix under which every policed route is nested.
pub const API_PREFIX: &str = "/api/v1";

/// Access
///
/// Who may call a route. Evaluated once per request by `authorize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No token required.
    Public,
    /// Any valid token, whether or not a user record exists yet.
    Authenticated,
    ModeratorOrAdmin,
    AdminOnly,
}

impl Access {
    /// Role predicate for a caller whose token already verified.
    pub fn permits(self, role: Option<Role>) -> bool {
        match self {
            Self::Public | Self::Authenticated => true,
            Self::ModeratorOrAdmin => role.is_some_and(Role::is_staff),
            Self::AdminOnly => role == Some(Role::Admin),
        }
    }

    fn denial(self) -> &'static str {
        match self {
            Self::ModeratorOrAdmin => "Forbidden: moderator or admin access required",
            Self::AdminOnly => "Forbidden: admin access required",
            Self::Public | Self::Authenticated => "Forbidden",
        }
    }
}

/// Verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl Verb {
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::POST => Some(Self::Post),
            Method::PATCH => Some(Self::Patch),
            Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

use Access::{AdminOnly, Authenticated, ModeratorOrAdmin, Public};
use Verb::{Delete, Get, Patch, Post};

/// ROUTE_POLICIES
///
/// Every route served under `/api/v1`, with the access it requires. Paths use
/// the router's own template syntax so they compare equal to `MatchedPath`.
/// A route missing here is denied.
pub static ROUTE_POLICIES: &[(Verb, &str, Access)] = &[
    // auth
    (Post, "/auth/jwt", Public),
    // users
    (Post, "/users", Public),
    (Get, "/users", AdminOnly),
    (Get, "/users/{id}", Authenticated),
    (Patch, "/users/{id}", Authenticated),
    (Delete, "/users/{id}", AdminOnly),
    (Patch, "/users/{id}/role", AdminOnly),
    // scholarships
    (Get, "/scholarships", Public),
    (Get, "/scholarships/top", Public),
    (Get, "/scholarships/category/{category}", Public),
    (Get, "/scholarships/{id}", Public),
    (Post, "/scholarships", AdminOnly),
    (Patch, "/scholarships/{id}", AdminOnly),
    (Delete, "/scholarships/{id}", AdminOnly),
    // applications
    (Post, "/applications", Authenticated),
    (Get, "/applications", ModeratorOrAdmin),
    (Get, "/applications/user/{email}", Authenticated),
    (Patch, "/applications/{id}", Authenticated),
    (Delete, "/applications/{id}", Authenticated),
    (Patch, "/applications/{id}/status", ModeratorOrAdmin),
    (Patch, "/applications/{id}/feedback", ModeratorOrAdmin),
    (Patch, "/applications/{id}/payment", Authenticated),
    // reviews
    (Get, "/reviews", ModeratorOrAdmin),
    (Post, "/reviews", Authenticated),
    (Get, "/reviews/scholarship/{id}", Public),
    (Get, "/reviews/user/{email}", Authenticated),
    (Patch, "/reviews/{id}", Authenticated),
    (Delete, "/reviews/{id}", Authenticated),
    // payments
    (Post, "/payments/create-payment-intent", Authenticated),
    // analytics
    (Get, "/analytics/stats", AdminOnly),
    (Get, "/analytics/applications-by-university", AdminOnly),
    (Get, "/analytics/applications-by-category", AdminOnly),
    (Get, "/analytics/applications-series", AdminOnly),
    (Get, "/analytics/top-scholarships", AdminOnly),
];

/// lookup
///
/// Finds the access rule for a method and route template. The template may be
/// given with or without the `/api/v1` prefix.
pub fn lookup(method: &Method, path: &str) -> Option<Access> {
    let verb = Verb::from_method(method)?;
    let relative = path.strip_prefix(API_PREFIX).unwrap_or(path);

    ROUTE_POLICIES
        .iter()
        .find(|(v, p, _)| *v == verb && *p == relative)
        .map(|(_, _, access)| *access)
}

/// authorize
///
/// The single access-control stage for `/api/v1`. Public routes pass straight
/// through. Everything else needs a valid bearer token (Token Verifier); the
/// caller's role is then read from the store on every request (Role Resolver)
/// and checked against the route's `Access`. On success a `Caller` is placed in
/// the request extensions for the handler.
pub async fn authorize(
    State(state): State<AppState>,
    matched: Option<MatchedPath>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = matched
        .as_ref()
        .map(MatchedPath::as_str)
        .unwrap_or_else(|| request.uri().path())
        .to_string();

    let Some(access) = lookup(request.method(), &path) else {
        tracing::warn!(method = %request.method(), path = %path, "route has no access policy");
        return Err(AppError::forbidden("Forbidden"));
    };

    if access == Access::Public {
        return Ok(next.run(request).await);
    }

    let claims = verify_bearer(request.headers(), &state.config.jwt_secret)?;
    let role = state
        .repo
        .find_user_by_email(&claims.email)
        .await?
        .map(|user| user.role);

    if !access.permits(role) {
        tracing::warn!(
            email = %claims.email,
            role = ?role,
            path = %path,
            "access denied by route policy"
        );
        return Err(AppError::forbidden(access.denial()));
    }

    request.extensions_mut().insert(Caller {
        email: claims.email,
        role,
    });
    Ok(next.run(request).await)
}
