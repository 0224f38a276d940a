//! Ownership and lifecycle checks that sit between the policy table and the
//! store. The policy middleware answers "may this role call this route"; these
//! answer "may this caller touch this record in its current state".

use crate::{
    auth::Caller,
    error::AppError,
    models::{Application, ApplicationStatus, PaymentStatus},
};

/// The caller may only read data filed under their own email.
pub fn ensure_self(caller: &Caller, email: &str) -> Result<(), AppError> {
    if caller.owns(email) {
        Ok(())
    } else {
        tracing::warn!(caller = %caller.email, requested = %email, "cross-account read denied");
        Err(AppError::forbidden("Forbidden: you can only access your own records"))
    }
}

pub fn ensure_owner_or_admin(caller: &Caller, owner: &str) -> Result<(), AppError> {
    if caller.owns(owner) || caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Forbidden: not the owner of this record"))
    }
}

pub fn ensure_owner_or_staff(caller: &Caller, owner: &str) -> Result<(), AppError> {
    if caller.owns(owner) || caller.is_staff() {
        Ok(())
    } else {
        Err(AppError::forbidden("Forbidden: not the owner of this record"))
    }
}

/// ensure_pending_owner
///
/// Students may edit or withdraw their own application only while it is pending.
pub fn ensure_pending_owner(caller: &Caller, application: &Application) -> Result<(), AppError> {
    if !caller.owns(&application.user_email) {
        return Err(AppError::forbidden("Forbidden: not the owner of this application"));
    }
    if application.application_status != ApplicationStatus::Pending {
        return Err(AppError::forbidden(
            "Can only update/delete pending applications",
        ));
    }
    Ok(())
}

/// ensure_status_transition
///
/// `pending` may move to any other status; every other status is final.
pub fn ensure_status_transition(
    current: ApplicationStatus,
    next: ApplicationStatus,
) -> Result<(), AppError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::conflict(format!(
            "Cannot change application status from {} to {}",
            current.as_str(),
            next.as_str()
        )))
    }
}

/// A paid application cannot be marked unpaid again.
pub fn ensure_payment_transition(
    current: PaymentStatus,
    next: PaymentStatus,
) -> Result<(), AppError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::conflict(format!(
            "Cannot change payment status from {} to {}",
            current.as_str(),
            next.as_str()
        )))
    }
}

/// Ratings are whole or fractional points between 1 and 5.
pub fn validate_rating(rating: f64) -> Result<(), AppError> {
    if rating.is_finite() && (1.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::validation("ratingPoint must be between 1 and 5"))
    }
}

/// Minimal shape check for emails arriving in paths and bodies.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::validation(format!("Invalid email: {email}"))),
    }
}
