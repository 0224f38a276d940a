use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    analytics::{
        GroupField, SeriesRange, UNIVERSITY_LIMIT, bucket_series, format_fees, sum_paid_fees,
        top_scholarships_limit,
    },
    error::{AppError, ErrorBody},
    extract::ApiQuery,
    models::{ApiResponse, ApplicationSeries, DashboardStats, GroupCount},
    repository::RepositoryState,
};

/// TopScholarshipsParams
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopScholarshipsParams {
    /// Defaults to 6, clamped to 1..=50.
    pub limit: Option<i64>,
}

/// SeriesParams
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeriesParams {
    /// `week` (default), `quarter` or `year`.
    pub range: Option<String>,
}

/// dashboard_stats
///
/// [Admin Route] Headline counts plus total fees collected on paid applications.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/stats",
    responses((status = 200, description = "Dashboard counts", body = ApiResponse<DashboardStats>)),
    security(("bearer" = [])),
    tag = "analytics"
)]
pub async fn dashboard_stats(
    State(repo): State<RepositoryState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let (total_users, total_scholarships, total_applications, paid) = tokio::try_join!(
        repo.count_users(),
        repo.count_scholarships(),
        repo.count_applications(),
        repo.paid_applications(),
    )?;

    Ok(Json(ApiResponse::data(DashboardStats {
        total_users,
        total_scholarships,
        total_applications,
        total_fees_collected: format_fees(sum_paid_fees(&paid)),
    })))
}

/// applications_by_university
///
/// [Admin Route] Top ten universities by application count.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/applications-by-university",
    responses((status = 200, description = "Grouped counts", body = ApiResponse<Vec<GroupCount>>)),
    security(("bearer" = [])),
    tag = "analytics"
)]
pub async fn applications_by_university(
    State(repo): State<RepositoryState>,
) -> Result<Json<ApiResponse<Vec<GroupCount>>>, AppError> {
    let rows = repo
        .group_applications(GroupField::University, Some(UNIVERSITY_LIMIT))
        .await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// applications_by_category
///
/// [Admin Route] Every category with its application count.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/applications-by-category",
    responses((status = 200, description = "Grouped counts", body = ApiResponse<Vec<GroupCount>>)),
    security(("bearer" = [])),
    tag = "analytics"
)]
pub async fn applications_by_category(
    State(repo): State<RepositoryState>,
) -> Result<Json<ApiResponse<Vec<GroupCount>>>, AppError> {
    let rows = repo.group_applications(GroupField::Category, None).await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// top_scholarships
///
/// [Admin Route] Most-applied-to scholarships.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/top-scholarships",
    params(TopScholarshipsParams),
    responses((status = 200, description = "Grouped counts", body = ApiResponse<Vec<GroupCount>>)),
    security(("bearer" = [])),
    tag = "analytics"
)]
pub async fn top_scholarships(
    State(repo): State<RepositoryState>,
    ApiQuery(params): ApiQuery<TopScholarshipsParams>,
) -> Result<Json<ApiResponse<Vec<GroupCount>>>, AppError> {
    let limit = top_scholarships_limit(params.limit);
    let rows = repo
        .group_applications(GroupField::ScholarshipName, Some(limit))
        .await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// applications_series
///
/// [Admin Route] Zero-filled application counts over the requested range,
/// oldest bucket first.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/applications-series",
    params(SeriesParams),
    responses(
        (status = 200, description = "Time series", body = ApiResponse<ApplicationSeries>),
        (status = 400, description = "Unknown range", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "analytics"
)]
pub async fn applications_series(
    State(repo): State<RepositoryState>,
    ApiQuery(params): ApiQuery<SeriesParams>,
) -> Result<Json<ApiResponse<ApplicationSeries>>, AppError> {
    let range = SeriesRange::parse(params.range.as_deref())?;
    let now = Utc::now();

    let dates = repo.application_dates_since(range.window_start(now)).await?;
    let (labels, data) = bucket_series(range, now, &dates);

    Ok(Json(ApiResponse::data(ApplicationSeries {
        range: range.as_str().to_string(),
        labels,
        data,
    })))
}
