use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Deserialize;

use super::{ensure_patch_not_empty, parse_object_id};
use crate::{
    auth::Caller,
    error::{AppError, ErrorBody},
    extract::{ApiJson, ApiQuery},
    models::{
        ApiResponse, CreateScholarshipRequest, MutationResponse, Scholarship, ScholarshipCategory,
        ScholarshipPage, UpdateScholarshipRequest,
    },
    query::{ScholarshipQuery, ScholarshipSearchParams},
    repository::RepositoryState,
};

/// How many scholarships `GET /scholarships/top` returns.
pub const TOP_SCHOLARSHIPS: i64 = 6;
/// How many recommendations `GET /scholarships/category/{category}` returns.
pub const CATEGORY_RECOMMENDATIONS: i64 = 4;

/// CategoryFilter
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CategoryFilter {
    /// Scholarship to leave out, usually the one being viewed.
    pub exclude_id: Option<String>,
}

fn validate_money(name: &str, value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::validation(format!(
            "{name} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

/// list_scholarships
///
/// [Public Route] Catalogue search with filtering, sorting and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/scholarships",
    params(ScholarshipSearchParams),
    responses(
        (status = 200, description = "One page of scholarships", body = ScholarshipPage),
        (status = 400, description = "Unknown category", body = ErrorBody)
    ),
    tag = "scholarships"
)]
pub async fn list_scholarships(
    State(repo): State<RepositoryState>,
    ApiQuery(params): ApiQuery<ScholarshipSearchParams>,
) -> Result<Json<ScholarshipPage>, AppError> {
    let query = ScholarshipQuery::from_params(params)?;
    let slice = repo.search_scholarships(&query).await?;

    Ok(Json(ScholarshipPage {
        success: true,
        data: slice.items,
        current_page: query.page(),
        total_pages: query.total_pages(slice.total),
        total_scholarships: slice.total,
    }))
}

/// top_scholarships
///
/// [Public Route] The six scholarships with the lowest application fee.
#[utoipa::path(
    get,
    path = "/api/v1/scholarships/top",
    responses((status = 200, description = "Cheapest scholarships", body = ApiResponse<Vec<Scholarship>>)),
    tag = "scholarships"
)]
pub async fn top_scholarships(
    State(repo): State<RepositoryState>,
) -> Result<Json<ApiResponse<Vec<Scholarship>>>, AppError> {
    let scholarships = repo.cheapest_scholarships(TOP_SCHOLARSHIPS).await?;
    Ok(Json(ApiResponse::list(scholarships)))
}

/// scholarships_by_category
///
/// [Public Route] Up to four scholarships sharing a category.
#[utoipa::path(
    get,
    path = "/api/v1/scholarships/category/{category}",
    params(
        ("category" = String, Path, description = "Scholarship category"),
        CategoryFilter
    ),
    responses(
        (status = 200, description = "Related scholarships", body = ApiResponse<Vec<Scholarship>>),
        (status = 400, description = "Unknown category or bad id", body = ErrorBody)
    ),
    tag = "scholarships"
)]
pub async fn scholarships_by_category(
    State(repo): State<RepositoryState>,
    Path(category): Path<String>,
    ApiQuery(filter): ApiQuery<CategoryFilter>,
) -> Result<Json<ApiResponse<Vec<Scholarship>>>, AppError> {
    let category = ScholarshipCategory::parse(&category)
        .ok_or_else(|| AppError::validation(format!("Unknown category: {category}")))?;
    let exclude = filter
        .exclude_id
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_object_id)
        .transpose()?;

    let scholarships = repo
        .scholarships_in_category(category, exclude, CATEGORY_RECOMMENDATIONS)
        .await?;
    Ok(Json(ApiResponse::list(scholarships)))
}

/// get_scholarship
#[utoipa::path(
    get,
    path = "/api/v1/scholarships/{id}",
    params(("id" = String, Path, description = "Scholarship ObjectId")),
    responses(
        (status = 200, description = "Scholarship", body = ApiResponse<Scholarship>),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Scholarship not found", body = ErrorBody)
    ),
    tag = "scholarships"
)]
pub async fn get_scholarship(
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Scholarship>>, AppError> {
    let id = parse_object_id(&id)?;
    let scholarship = repo
        .find_scholarship(id)
        .await?
        .ok_or_else(|| AppError::not_found("Scholarship not found"))?;
    Ok(Json(ApiResponse::data(scholarship)))
}

/// create_scholarship
///
/// [Admin Route] Adds a listing, stamping its post date.
#[utoipa::path(
    post,
    path = "/api/v1/scholarships",
    request_body = CreateScholarshipRequest,
    responses(
        (status = 200, description = "Scholarship created", body = MutationResponse),
        (status = 400, description = "Invalid body", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "scholarships"
)]
pub async fn create_scholarship(
    caller: Caller,
    State(repo): State<RepositoryState>,
    ApiJson(mut payload): ApiJson<CreateScholarshipRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    validate_money("applicationFees", Some(payload.application_fees))?;
    validate_money("serviceCharge", Some(payload.service_charge))?;
    validate_money("tuitionFees", payload.tuition_fees)?;
    if payload.posted_user_email.is_none() {
        payload.posted_user_email = Some(caller.email.clone());
    }

    let id = repo.insert_scholarship(payload, Utc::now()).await?;
    tracing::info!(admin = %caller.email, scholarship_id = %id, "scholarship created");

    Ok(Json(MutationResponse::inserted(
        "Scholarship created successfully",
        id,
    )))
}

/// update_scholarship
///
/// [Admin Route] Writes only the fields present in the body.
#[utoipa::path(
    patch,
    path = "/api/v1/scholarships/{id}",
    params(("id" = String, Path, description = "Scholarship ObjectId")),
    request_body = UpdateScholarshipRequest,
    responses(
        (status = 200, description = "Scholarship updated", body = MutationResponse),
        (status = 404, description = "Scholarship not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "scholarships"
)]
pub async fn update_scholarship(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UpdateScholarshipRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;
    ensure_patch_not_empty(&patch)?;
    validate_money("applicationFees", patch.application_fees)?;
    validate_money("serviceCharge", patch.service_charge)?;
    validate_money("tuitionFees", patch.tuition_fees)?;

    let outcome = repo.update_scholarship(id, patch).await?;
    if !outcome.found() {
        return Err(AppError::not_found("Scholarship not found"));
    }

    tracing::info!(admin = %caller.email, scholarship_id = %id, "scholarship updated");
    Ok(Json(MutationResponse::modified(
        "Scholarship updated successfully",
        outcome.modified,
    )))
}

/// delete_scholarship
///
/// [Admin Route]
#[utoipa::path(
    delete,
    path = "/api/v1/scholarships/{id}",
    params(("id" = String, Path, description = "Scholarship ObjectId")),
    responses(
        (status = 200, description = "Scholarship deleted", body = MutationResponse),
        (status = 404, description = "Scholarship not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "scholarships"
)]
pub async fn delete_scholarship(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;

    if !repo.delete_scholarship(id).await? {
        return Err(AppError::not_found("Scholarship not found"));
    }

    tracing::info!(admin = %caller.email, scholarship_id = %id, "scholarship deleted");
    Ok(Json(MutationResponse::message("Scholarship deleted successfully")))
}
