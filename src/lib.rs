use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
    routing::get,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core services: identity, access policy, lifecycle rules, persistence.
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod guard;
pub mod models;
pub mod payments;
pub mod policy;
pub mod repository;

// Query shaping and reporting over the document store.
pub mod analytics;
pub mod query;

pub mod handlers;
pub mod routes;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use payments::{MockPaymentGateway, PaymentState, StripeClient};
pub use repository::{MongoRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for every `#[utoipa::path]` handler, served at
/// `/api-docs/openapi.json` and browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root, handlers::health,
        handlers::auth::issue_jwt,
        handlers::users::create_user, handlers::users::get_user, handlers::users::list_users,
        handlers::users::update_user, handlers::users::update_user_role,
        handlers::users::delete_user,
        handlers::scholarships::list_scholarships, handlers::scholarships::top_scholarships,
        handlers::scholarships::scholarships_by_category,
        handlers::scholarships::get_scholarship, handlers::scholarships::create_scholarship,
        handlers::scholarships::update_scholarship,
        handlers::scholarships::delete_scholarship,
        handlers::applications::create_application, handlers::applications::my_applications,
        handlers::applications::all_applications,
        handlers::applications::update_application_status,
        handlers::applications::add_feedback, handlers::applications::update_payment_status,
        handlers::applications::update_application,
        handlers::applications::delete_application,
        handlers::reviews::reviews_for_scholarship, handlers::reviews::my_reviews,
        handlers::reviews::all_reviews, handlers::reviews::create_review,
        handlers::reviews::update_review, handlers::reviews::delete_review,
        handlers::payments::create_payment_intent,
        handlers::analytics::dashboard_stats, handlers::analytics::applications_by_university,
        handlers::analytics::applications_by_category, handlers::analytics::top_scholarships,
        handlers::analytics::applications_series,
    ),
    components(
        schemas(
            models::User, models::Scholarship, models::Application, models::ApplicantDetails,
            models::Review, models::Role, models::ScholarshipCategory,
            models::ApplicationStatus, models::PaymentStatus, models::MutationResponse,
            models::ScholarshipPage, models::DashboardStats, models::GroupCount,
            models::ApplicationSeries, error::ErrorBody,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "scholar-stream", description = "Scholarship marketplace API")
    )
)]
struct ApiDoc;

/// Registers the `bearer` security scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// AppState
///
/// The single shared container for the application's services and
/// configuration, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer (MongoDB, or an in-memory double in tests).
    pub repo: RepositoryState,
    /// Payment processor gateway.
    pub payments: PaymentState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Handlers pull only the component they need from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for PaymentState {
    fn from_ref(app_state: &AppState) -> PaymentState {
        app_state.payments.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// cors_layer
///
/// Allows the configured front-end origins with credentials.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// create_router
///
/// Assembles the full application: health and docs routes, the `/api/v1`
/// tree behind the policy middleware, the JSON 404 fallback, and the
/// observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // The policy stage runs after routing so it can see the matched route template.
    let api = routes::api_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        policy::authorize,
    ));

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        .nest(policy::API_PREFIX, api)
        .fallback(handlers::not_found)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span: method, URI and the `x-request-id` set by
/// `SetRequestIdLayer`, so every log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
