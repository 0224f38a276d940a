mod common;

use scholar_stream::{
    AppError,
    auth::Caller,
    guard::{
        ensure_owner_or_admin, ensure_owner_or_staff, ensure_payment_transition,
        ensure_pending_owner, ensure_self, ensure_status_transition, validate_email,
        validate_rating,
    },
    models::{ApplicationStatus, PaymentStatus, Role},
};

use common::{OTHER_STUDENT, STUDENT, sample_application};

fn caller(email: &str, role: Option<Role>) -> Caller {
    Caller {
        email: email.to_string(),
        role,
    }
}

#[test]
fn self_access_is_by_email() {
    let student = caller(STUDENT, Some(Role::Student));
    assert!(ensure_self(&student, STUDENT).is_ok());
    assert!(matches!(
        ensure_self(&student, OTHER_STUDENT),
        Err(AppError::Forbidden(_))
    ));

    // Even an admin reads other people's dashboards through the admin listings.
    let admin = caller("admin@example.com", Some(Role::Admin));
    assert!(ensure_self(&admin, STUDENT).is_err());
}

#[test]
fn owner_or_role_checks() {
    let owner = caller(STUDENT, Some(Role::Student));
    let stranger = caller(OTHER_STUDENT, Some(Role::Student));
    let moderator = caller("mod@example.com", Some(Role::Moderator));
    let admin = caller("admin@example.com", Some(Role::Admin));

    assert!(ensure_owner_or_admin(&owner, STUDENT).is_ok());
    assert!(ensure_owner_or_admin(&admin, STUDENT).is_ok());
    assert!(ensure_owner_or_admin(&moderator, STUDENT).is_err());
    assert!(ensure_owner_or_admin(&stranger, STUDENT).is_err());

    assert!(ensure_owner_or_staff(&moderator, STUDENT).is_ok());
    assert!(ensure_owner_or_staff(&stranger, STUDENT).is_err());
}

#[test]
fn pending_owner_guard() {
    let owner = caller(STUDENT, Some(Role::Student));
    let stranger = caller(OTHER_STUDENT, Some(Role::Student));

    let pending = sample_application(STUDENT, ApplicationStatus::Pending, PaymentStatus::Unpaid);
    assert!(ensure_pending_owner(&owner, &pending).is_ok());
    assert!(matches!(
        ensure_pending_owner(&stranger, &pending),
        Err(AppError::Forbidden(_))
    ));

    for status in [
        ApplicationStatus::Processing,
        ApplicationStatus::Completed,
        ApplicationStatus::Rejected,
    ] {
        let decided = sample_application(STUDENT, status, PaymentStatus::Paid);
        match ensure_pending_owner(&owner, &decided) {
            Err(AppError::Forbidden(message)) => {
                assert_eq!(message, "Can only update/delete pending applications")
            }
            other => panic!("expected 403 for {status:?}, got {other:?}"),
        }
    }
}

#[test]
fn illegal_transitions_conflict() {
    assert!(ensure_status_transition(ApplicationStatus::Pending, ApplicationStatus::Completed).is_ok());
    assert!(matches!(
        ensure_status_transition(ApplicationStatus::Completed, ApplicationStatus::Pending),
        Err(AppError::Conflict(_))
    ));
    assert!(ensure_payment_transition(PaymentStatus::Unpaid, PaymentStatus::Paid).is_ok());
    assert!(matches!(
        ensure_payment_transition(PaymentStatus::Paid, PaymentStatus::Unpaid),
        Err(AppError::Conflict(_))
    ));
}

#[test]
fn rating_bounds() {
    for ok in [1.0, 2.5, 5.0] {
        assert!(validate_rating(ok).is_ok(), "{ok} rejected");
    }
    for bad in [0.0, 0.99, 5.01, -1.0, f64::NAN, f64::INFINITY] {
        assert!(validate_rating(bad).is_err(), "{bad} accepted");
    }
}

#[test]
fn email_shape() {
    assert!(validate_email("sam@example.com").is_ok());
    assert!(validate_email("  sam@example.com ").is_ok());
    for bad in ["", "sam", "@example.com", "sam@localhost"] {
        assert!(validate_email(bad).is_err(), "{bad:?} accepted");
    }
}
