use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Enumerations ---

/// Role
///
/// The RBAC field stored on every user record. New accounts start as `Student`;
/// only an Admin can change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum Role {
    #[default]
    Student,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Moderator => "Moderator",
            Self::Admin => "Admin",
        }
    }

    /// Parses the stored spelling (`Student`, `Moderator`, `Admin`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Student" => Some(Self::Student),
            "Moderator" => Some(Self::Moderator),
            "Admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Moderators and Admins triage applications and reviews.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }
}

/// ScholarshipCategory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum ScholarshipCategory {
    #[serde(rename = "Merit-based")]
    MeritBased,
    #[serde(rename = "Need-based")]
    NeedBased,
    Sports,
    Arts,
    Research,
    International,
}

impl ScholarshipCategory {
    pub const ALL: [Self; 6] = [
        Self::MeritBased,
        Self::NeedBased,
        Self::Sports,
        Self::Arts,
        Self::Research,
        Self::International,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MeritBased => "Merit-based",
            Self::NeedBased => "Need-based",
            Self::Sports => "Sports",
            Self::Arts => "Arts",
            Self::Research => "Research",
            Self::International => "International",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == raw)
    }
}

/// ApplicationStatus
///
/// `pending` is the only state a student may edit from, and the only state a
/// moderator may move an application out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// Once an application has left `pending` its status is final.
    pub fn can_transition_to(self, next: Self) -> bool {
        self == Self::Pending && next != Self::Pending
    }
}

/// PaymentStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }

    /// `unpaid -> paid` only; re-marking a paid application is a no-op.
    pub fn can_transition_to(self, next: Self) -> bool {
        !(self == Self::Paid && next == Self::Unpaid)
    }
}

// --- Core Records ---

/// User
///
/// A marketplace account, keyed by its unique email.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Format `SS-YYYYMMDD-NNNNN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

/// Scholarship
///
/// A public catalogue listing. Only Admins create, edit or remove them.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Scholarship {
    #[serde(rename = "_id")]
    pub id: String,
    pub scholarship_name: String,
    pub university_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_image: Option<String>,
    pub university_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_world_rank: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_category: Option<String>,
    pub scholarship_category: ScholarshipCategory,
    pub degree: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuition_fees: Option<f64>,
    pub application_fees: f64,
    pub service_charge: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship_post_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship_description: Option<String>,
}

/// Application
///
/// A student's submission against one scholarship. `user_email` is the owner.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: String,
    pub scholarship_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship_name: Option<String>,
    pub university_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship_category: Option<ScholarshipCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    pub application_fees: f64,
    pub service_charge: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub user_email: String,
    #[serde(flatten)]
    pub applicant: ApplicantDetails,
    pub application_status: ApplicationStatus,
    pub payment_status: PaymentStatus,
    pub feedback: String,
    pub application_date: DateTime<Utc>,
}

/// ApplicantDetails
///
/// The self-service part of an application: the only fields a student may
/// change while the application is still pending.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApplicantDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssc_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsc_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_gap: Option<String>,
}

impl ApplicantDetails {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Review
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub scholarship_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
    pub rating_point: f64,
    pub review_comment: String,
    pub review_date: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// TokenRequest
///
/// Body of `POST /auth/jwt`. The identity provider has already authenticated
/// the browser; this endpoint only mints the API bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TokenRequest {
    pub email: String,
}

/// CreateUserRequest
///
/// Sent on every sign-in. Creates the record on first sight and otherwise
/// fills in missing profile fields.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// UpdateUserRequest
///
/// Profile edit. Email, role, creation date and student id are not editable here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.photo_url.is_none()
    }
}

/// UpdateRoleRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// CreateScholarshipRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateScholarshipRequest {
    pub scholarship_name: String,
    pub university_name: String,
    #[serde(default)]
    pub university_image: Option<String>,
    pub university_country: String,
    #[serde(default)]
    pub university_city: Option<String>,
    #[serde(default)]
    pub university_world_rank: Option<i32>,
    #[serde(default)]
    pub subject_category: Option<String>,
    pub scholarship_category: ScholarshipCategory,
    pub degree: String,
    #[serde(default)]
    pub tuition_fees: Option<f64>,
    pub application_fees: f64,
    pub service_charge: f64,
    #[serde(default)]
    pub application_deadline: Option<String>,
    #[serde(default)]
    pub posted_user_email: Option<String>,
    #[serde(default)]
    pub scholarship_description: Option<String>,
}

/// UpdateScholarshipRequest
///
/// Partial update. Only the provided fields are written.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateScholarshipRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_world_rank: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_category: Option<ScholarshipCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition_fees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_fees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_description: Option<String>,
}

/// CreateApplicationRequest
///
/// The applicant's email is never read from the body; it comes from the
/// verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateApplicationRequest {
    pub scholarship_id: String,
    #[serde(default)]
    pub scholarship_name: Option<String>,
    pub university_name: String,
    #[serde(default)]
    pub university_country: Option<String>,
    #[serde(default)]
    pub scholarship_category: Option<ScholarshipCategory>,
    #[serde(default)]
    pub degree: Option<String>,
    pub application_fees: f64,
    pub service_charge: f64,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(flatten)]
    pub applicant: ApplicantDetails,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

/// UpdateApplicationStatusRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateApplicationStatusRequest {
    pub application_status: ApplicationStatus,
}

/// FeedbackRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct FeedbackRequest {
    pub feedback: String,
}

/// UpdatePaymentStatusRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

/// CreateReviewRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateReviewRequest {
    pub scholarship_id: String,
    #[serde(default)]
    pub scholarship_name: Option<String>,
    #[serde(default)]
    pub university_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_image: Option<String>,
    pub rating_point: f64,
    pub review_comment: String,
}

/// UpdateReviewRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateReviewRequest {
    pub rating_point: f64,
    pub review_comment: String,
}

/// PaymentIntentRequest
///
/// `amount` is in major currency units (dollars).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PaymentIntentRequest {
    pub amount: f64,
}

// --- Insert Values (server-stamped) ---

/// A user record about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub photo_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub student_id: String,
}

/// An application about to be inserted, owner and lifecycle fields already set.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub request: CreateApplicationRequest,
    pub user_email: String,
    pub application_status: ApplicationStatus,
    pub payment_status: PaymentStatus,
    pub feedback: String,
    pub application_date: DateTime<Utc>,
}

/// A review about to be inserted.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub request: CreateReviewRequest,
    pub user_email: String,
    pub review_date: DateTime<Utc>,
}

// --- Response Envelopes (Output Schemas) ---

/// ApiResponse
///
/// The canonical `{success, data}` envelope. List responses also carry `count`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

/// MutationResponse
///
/// Result of a create/update/delete: a message plus whichever of the
/// inserted id, modified count or `updated` flag applies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<bool>,
}

impl MutationResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            inserted_id: None,
            modified_count: None,
            updated: None,
        }
    }

    pub fn inserted(message: impl Into<String>, id: String) -> Self {
        Self {
            inserted_id: Some(id),
            ..Self::message(message)
        }
    }

    pub fn modified(message: impl Into<String>, count: u64) -> Self {
        Self {
            modified_count: Some(count),
            ..Self::message(message)
        }
    }

    pub fn with_updated(mut self, updated: bool) -> Self {
        self.updated = Some(updated);
        self
    }
}

/// ScholarshipPage
///
/// One page of `GET /scholarships` plus the numbers needed to render a pager.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipPage {
    pub success: bool,
    pub data: Vec<Scholarship>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_scholarships: u64,
}

/// TokenResponse
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// PaymentIntentResponse
///
/// `client_secret` lets the browser confirm the card charge directly with the processor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub success: bool,
    pub client_secret: String,
}

/// DashboardStats
///
/// Output of `GET /analytics/stats`. The fee total is rendered with two decimals.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_scholarships: u64,
    pub total_applications: u64,
    pub total_fees_collected: String,
}

/// GroupCount
///
/// One row of a grouped analytics view. `name` is null for records missing the
/// grouped field.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct GroupCount {
    pub name: Option<String>,
    pub count: i64,
}

/// ApplicationSeries
///
/// Zero-filled application counts, oldest bucket first. `labels[i]` is the
/// first day (UTC) covered by `data[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct ApplicationSeries {
    pub range: String,
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

/// HealthResponse
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
