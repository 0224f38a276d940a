use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use chrono::Utc;

use super::{ensure_patch_not_empty, parse_object_id};
use crate::{
    auth::Caller,
    error::{AppError, ErrorBody},
    extract::ApiJson,
    guard::{
        ensure_owner_or_staff, ensure_payment_transition, ensure_pending_owner, ensure_self,
        ensure_status_transition,
    },
    models::{
        ApiResponse, ApplicantDetails, Application, ApplicationStatus, CreateApplicationRequest,
        FeedbackRequest, MutationResponse, NewApplication, PaymentStatus,
        UpdateApplicationStatusRequest, UpdatePaymentStatusRequest,
    },
    repository::RepositoryState,
};

async fn load_application(repo: &RepositoryState, id: ObjectId) -> Result<Application, AppError> {
    repo.find_application(id)
        .await?
        .ok_or_else(|| AppError::not_found("Application not found"))
}

/// create_application
///
/// [Authenticated Route] Files an application for the caller. The owner email
/// always comes from the token; lifecycle fields start at pending / unpaid.
#[utoipa::path(
    post,
    path = "/api/v1/applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 200, description = "Application created", body = MutationResponse),
        (status = 400, description = "Invalid body", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn create_application(
    caller: Caller,
    State(repo): State<RepositoryState>,
    ApiJson(payload): ApiJson<CreateApplicationRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    if payload.scholarship_id.trim().is_empty() {
        return Err(AppError::validation("scholarshipId is required"));
    }
    for (name, value) in [
        ("applicationFees", payload.application_fees),
        ("serviceCharge", payload.service_charge),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::validation(format!(
                "{name} must be a non-negative number"
            )));
        }
    }

    let payment_status = payload.payment_status.unwrap_or_default();
    let application = NewApplication {
        request: payload,
        user_email: caller.email.clone(),
        application_status: ApplicationStatus::Pending,
        payment_status,
        feedback: String::new(),
        application_date: Utc::now(),
    };

    let id = repo.insert_application(application).await?;
    tracing::info!(email = %caller.email, application_id = %id, "application submitted");

    Ok(Json(MutationResponse::inserted(
        "Application created successfully",
        id,
    )))
}

/// my_applications
///
/// [Authenticated Route] Applications filed under the caller's own email.
#[utoipa::path(
    get,
    path = "/api/v1/applications/user/{email}",
    params(("email" = String, Path, description = "The caller's own email")),
    responses(
        (status = 200, description = "Applications", body = ApiResponse<Vec<Application>>),
        (status = 403, description = "Not the caller's email", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn my_applications(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Vec<Application>>>, AppError> {
    ensure_self(&caller, &email)?;
    let applications = repo.applications_by_email(&email).await?;
    Ok(Json(ApiResponse::list(applications)))
}

/// all_applications
///
/// [Moderator/Admin Route]
#[utoipa::path(
    get,
    path = "/api/v1/applications",
    responses((status = 200, description = "Applications", body = ApiResponse<Vec<Application>>)),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn all_applications(
    State(repo): State<RepositoryState>,
) -> Result<Json<ApiResponse<Vec<Application>>>, AppError> {
    let applications = repo.all_applications().await?;
    Ok(Json(ApiResponse::list(applications)))
}

/// update_application_status
///
/// [Moderator/Admin Route] Moves a pending application to processing,
/// completed or rejected. Any other transition is a 409.
#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}/status",
    params(("id" = String, Path, description = "Application ObjectId")),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MutationResponse),
        (status = 404, description = "Application not found", body = ErrorBody),
        (status = 409, description = "Illegal transition", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn update_application_status(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateApplicationStatusRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let application = load_application(&repo, id).await?;
    let next = payload.application_status;
    ensure_status_transition(application.application_status, next)?;

    let outcome = repo
        .transition_application_status(id, application.application_status, next)
        .await?;
    if !outcome.found() {
        // The status moved between the read and the conditional write.
        return Err(AppError::conflict("Application status changed concurrently"));
    }

    tracing::info!(
        moderator = %caller.email,
        application_id = %id,
        from = application.application_status.as_str(),
        to = next.as_str(),
        "application status changed"
    );
    Ok(Json(MutationResponse::modified(
        "Application status updated successfully",
        outcome.modified,
    )))
}

/// add_feedback
///
/// [Moderator/Admin Route]
#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}/feedback",
    params(("id" = String, Path, description = "Application ObjectId")),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback saved", body = MutationResponse),
        (status = 404, description = "Application not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn add_feedback(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<FeedbackRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;

    let outcome = repo.set_application_feedback(id, payload.feedback.trim()).await?;
    if !outcome.found() {
        return Err(AppError::not_found("Application not found"));
    }

    tracing::info!(moderator = %caller.email, application_id = %id, "feedback added");
    Ok(Json(MutationResponse::modified(
        "Feedback added successfully",
        outcome.modified,
    )))
}

/// update_payment_status
///
/// [Authenticated Route] Owner or Moderator/Admin. `unpaid -> paid`; a paid
/// application cannot go back to unpaid.
#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}/payment",
    params(("id" = String, Path, description = "Application ObjectId")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment status updated", body = MutationResponse),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Application not found", body = ErrorBody),
        (status = 409, description = "Illegal transition", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn update_payment_status(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdatePaymentStatusRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let application = load_application(&repo, id).await?;
    ensure_owner_or_staff(&caller, &application.user_email)?;
    ensure_payment_transition(application.payment_status, payload.payment_status)?;

    let outcome = repo.set_payment_status(id, payload.payment_status).await?;
    if !outcome.found() {
        return Err(AppError::not_found("Application not found"));
    }

    if payload.payment_status == PaymentStatus::Paid && outcome.modified > 0 {
        tracing::info!(email = %caller.email, application_id = %id, "application marked paid");
    }
    Ok(Json(MutationResponse::modified(
        "Payment status updated successfully",
        outcome.modified,
    )))
}

/// update_application
///
/// [Authenticated Route] The owner edits applicant details while pending.
#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}",
    params(("id" = String, Path, description = "Application ObjectId")),
    request_body = ApplicantDetails,
    responses(
        (status = 200, description = "Application updated", body = MutationResponse),
        (status = 403, description = "Not the owner or no longer pending", body = ErrorBody),
        (status = 404, description = "Application not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn update_application(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ApplicantDetails>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;
    ensure_patch_not_empty(&patch)?;
    let application = load_application(&repo, id).await?;
    ensure_pending_owner(&caller, &application)?;

    let outcome = repo
        .update_pending_application(id, &caller.email, patch)
        .await?;
    if !outcome.found() {
        return Err(AppError::forbidden("Can only update pending applications"));
    }

    Ok(Json(MutationResponse::modified(
        "Application updated successfully",
        outcome.modified,
    )))
}

/// delete_application
///
/// [Authenticated Route] The owner withdraws a pending application.
#[utoipa::path(
    delete,
    path = "/api/v1/applications/{id}",
    params(("id" = String, Path, description = "Application ObjectId")),
    responses(
        (status = 200, description = "Application deleted", body = MutationResponse),
        (status = 403, description = "Not the owner or no longer pending", body = ErrorBody),
        (status = 404, description = "Application not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn delete_application(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let application = load_application(&repo, id).await?;
    ensure_pending_owner(&caller, &application)?;

    if !repo.delete_pending_application(id, &caller.email).await? {
        return Err(AppError::forbidden("Can only delete pending applications"));
    }

    tracing::info!(email = %caller.email, application_id = %id, "application withdrawn");
    Ok(Json(MutationResponse::message("Application deleted successfully")))
}
