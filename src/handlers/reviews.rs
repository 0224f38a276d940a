use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use super::parse_object_id;
use crate::{
    auth::Caller,
    error::{AppError, ErrorBody},
    extract::ApiJson,
    guard::{ensure_owner_or_staff, ensure_self, validate_rating},
    models::{
        ApiResponse, CreateReviewRequest, MutationResponse, NewReview, Review, UpdateReviewRequest,
    },
    repository::RepositoryState,
};

fn validate_comment(comment: &str) -> Result<(), AppError> {
    if comment.trim().is_empty() {
        Err(AppError::validation("reviewComment is required"))
    } else {
        Ok(())
    }
}

/// reviews_for_scholarship
///
/// [Public Route] Newest first.
#[utoipa::path(
    get,
    path = "/api/v1/reviews/scholarship/{id}",
    params(("id" = String, Path, description = "Scholarship id")),
    responses((status = 200, description = "Reviews", body = ApiResponse<Vec<Review>>)),
    tag = "reviews"
)]
pub async fn reviews_for_scholarship(
    State(repo): State<RepositoryState>,
    Path(scholarship_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Review>>>, AppError> {
    let reviews = repo.reviews_for_scholarship(scholarship_id.trim()).await?;
    Ok(Json(ApiResponse::list(reviews)))
}

/// my_reviews
///
/// [Authenticated Route]
#[utoipa::path(
    get,
    path = "/api/v1/reviews/user/{email}",
    params(("email" = String, Path, description = "The caller's own email")),
    responses(
        (status = 200, description = "Reviews", body = ApiResponse<Vec<Review>>),
        (status = 403, description = "Not the caller's email", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub async fn my_reviews(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Vec<Review>>>, AppError> {
    ensure_self(&caller, &email)?;
    let reviews = repo.reviews_by_email(&email).await?;
    Ok(Json(ApiResponse::list(reviews)))
}

/// all_reviews
///
/// [Moderator/Admin Route]
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    responses((status = 200, description = "Reviews", body = ApiResponse<Vec<Review>>)),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub async fn all_reviews(
    State(repo): State<RepositoryState>,
) -> Result<Json<ApiResponse<Vec<Review>>>, AppError> {
    let reviews = repo.all_reviews().await?;
    Ok(Json(ApiResponse::list(reviews)))
}

/// create_review
///
/// [Authenticated Route] The reviewer is always the caller.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review created", body = MutationResponse),
        (status = 400, description = "Rating out of range", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub async fn create_review(
    caller: Caller,
    State(repo): State<RepositoryState>,
    ApiJson(payload): ApiJson<CreateReviewRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    if payload.scholarship_id.trim().is_empty() {
        return Err(AppError::validation("scholarshipId is required"));
    }
    validate_rating(payload.rating_point)?;
    validate_comment(&payload.review_comment)?;

    let review = NewReview {
        request: payload,
        user_email: caller.email.clone(),
        review_date: Utc::now(),
    };
    let id = repo.insert_review(review).await?;
    tracing::info!(email = %caller.email, review_id = %id, "review posted");

    Ok(Json(MutationResponse::inserted("Review added successfully", id)))
}

/// update_review
///
/// [Authenticated Route] Owner only. Refreshes the review date.
#[utoipa::path(
    patch,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review ObjectId")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = MutationResponse),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Review not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub async fn update_review(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateReviewRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;
    validate_rating(payload.rating_point)?;
    validate_comment(&payload.review_comment)?;

    let review = repo
        .find_review(id)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;
    if !caller.owns(&review.user_email) {
        return Err(AppError::forbidden("Forbidden: not the owner of this review"));
    }

    let outcome = repo
        .update_own_review(
            id,
            &caller.email,
            payload.rating_point,
            &payload.review_comment,
            Utc::now(),
        )
        .await?;
    if !outcome.found() {
        return Err(AppError::not_found("Review not found"));
    }

    Ok(Json(MutationResponse::modified(
        "Review updated successfully",
        outcome.modified,
    )))
}

/// delete_review
///
/// [Authenticated Route] The author, or any Moderator/Admin.
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review ObjectId")),
    responses(
        (status = 200, description = "Review deleted", body = MutationResponse),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Review not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub async fn delete_review(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;

    let review = repo
        .find_review(id)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;
    ensure_owner_or_staff(&caller, &review.user_email)?;

    if !repo.delete_review(id).await? {
        return Err(AppError::not_found("Review not found"));
    }

    tracing::info!(email = %caller.email, review_id = %id, "review deleted");
    Ok(Json(MutationResponse::message("Review deleted successfully")))
}
