use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Deserialize;

use super::{ensure_patch_not_empty, parse_object_id};
use crate::{
    auth::Caller,
    error::{AppError, ErrorBody},
    extract::{ApiJson, ApiQuery},
    guard::{ensure_owner_or_admin, ensure_self, validate_email},
    models::{
        ApiResponse, CreateUserRequest, MutationResponse, NewUser, Role, UpdateRoleRequest,
        UpdateUserRequest, User,
    },
    repository::RepositoryState,
};

/// UserFilter
///
/// Query parameters of the admin user listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// `Student`, `Moderator` or `Admin`.
    pub role: Option<String>,
}

/// generate_student_id
///
/// `SS-YYYYMMDD-NNNNN` with the UTC date of `now` and a random five-digit suffix.
pub fn generate_student_id(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::rng().random_range(10000..=99999);
    format!("SS-{}-{suffix}", now.format("%Y%m%d"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// create_user
///
/// [Public Route] Called on every sign-in. Creates the account on first sight
/// (role `Student`, fresh student id); otherwise fills in a changed name or a
/// missing photo and reports whether anything was written.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created or already present", body = MutationResponse),
        (status = 400, description = "Invalid email", body = ErrorBody)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(repo): State<RepositoryState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let email = payload.email.trim().to_string();
    validate_email(&email)?;
    let name = non_blank(payload.name);
    let photo_url = non_blank(payload.photo_url);

    if let Some(existing) = repo.find_user_by_email(&email).await? {
        let patch = UpdateUserRequest {
            name: name.filter(|n| existing.name.as_deref() != Some(n.as_str())),
            photo_url: photo_url.filter(|_| existing.photo_url.is_none()),
        };
        if patch.is_empty() {
            return Ok(Json(
                MutationResponse::message("User already exists").with_updated(false),
            ));
        }

        let id = parse_object_id(&existing.id)?;
        repo.update_user_profile(id, patch).await?;
        tracing::info!(email = %email, "refreshed profile fields of existing user");
        return Ok(Json(
            MutationResponse::message("User exists, profile fields updated").with_updated(true),
        ));
    }

    let now = Utc::now();
    let new_user = NewUser {
        name,
        email: email.clone(),
        photo_url,
        role: Role::Student,
        created_at: now,
        student_id: generate_student_id(now),
    };

    match repo.insert_user(new_user).await? {
        Some(id) => {
            tracing::info!(email = %email, user_id = %id, "user created");
            Ok(Json(MutationResponse::inserted("User created successfully", id)))
        }
        None => Ok(Json(
            MutationResponse::message("User already exists").with_updated(false),
        )),
    }
}

/// get_user
///
/// [Authenticated Route] Returns the caller's own record, assigning a student
/// id first if the record predates them.
#[utoipa::path(
    get,
    path = "/api/v1/users/{email}",
    params(("email" = String, Path, description = "The caller's own email")),
    responses(
        (status = 200, description = "User", body = ApiResponse<User>),
        (status = 403, description = "Not the caller's email", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn get_user(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    ensure_self(&caller, &email)?;

    let mut user = repo
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if user.student_id.is_none() {
        let student_id = generate_student_id(Utc::now());
        let id = parse_object_id(&user.id)?;
        let outcome = repo.assign_student_id(id, &student_id).await?;
        if outcome.modified > 0 {
            user.student_id = Some(student_id);
        } else if let Some(current) = repo.find_user_by_id(id).await? {
            // Another request assigned one first.
            user.student_id = current.student_id;
        }
    }

    Ok(Json(ApiResponse::data(user)))
}

/// list_users
///
/// [Admin Route] All users, optionally filtered by role.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserFilter),
    responses(
        (status = 200, description = "Users", body = ApiResponse<Vec<User>>),
        (status = 400, description = "Unknown role", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(repo): State<RepositoryState>,
    ApiQuery(filter): ApiQuery<UserFilter>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let role = match non_blank(filter.role) {
        Some(raw) => Some(
            Role::parse(&raw).ok_or_else(|| AppError::validation(format!("Unknown role: {raw}")))?,
        ),
        None => None,
    };

    let users = repo.list_users(role).await?;
    Ok(Json(ApiResponse::list(users)))
}

/// update_user
///
/// [Authenticated Route] Profile edit (`name`, `photoURL`). Owner or Admin.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User ObjectId")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = MutationResponse),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn update_user(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UpdateUserRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;
    ensure_patch_not_empty(&patch)?;

    let target = repo
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    ensure_owner_or_admin(&caller, &target.email)?;

    let outcome = repo.update_user_profile(id, patch).await?;
    if !outcome.found() {
        return Err(AppError::not_found("User not found"));
    }

    Ok(Json(MutationResponse::modified(
        "User profile updated successfully",
        outcome.modified,
    )))
}

/// update_user_role
///
/// [Admin Route] Promotes or demotes a user.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/role",
    params(("id" = String, Path, description = "User ObjectId")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = MutationResponse),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn update_user_role(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;

    let outcome = repo.set_user_role(id, payload.role).await?;
    if !outcome.found() {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!(
        admin = %caller.email,
        user_id = %id,
        role = payload.role.as_str(),
        "user role changed"
    );
    Ok(Json(MutationResponse::modified(
        "User role updated successfully",
        outcome.modified,
    )))
}

/// delete_user
///
/// [Admin Route]
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "User deleted", body = MutationResponse),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn delete_user(
    caller: Caller,
    State(repo): State<RepositoryState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_object_id(&id)?;

    if !repo.delete_user(id).await? {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!(admin = %caller.email, user_id = %id, "user deleted");
    Ok(Json(MutationResponse::message("User deleted successfully")))
}
