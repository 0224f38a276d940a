use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    analytics::GroupField,
    models::{
        ApplicantDetails, Application, ApplicationStatus, CreateScholarshipRequest, GroupCount,
        NewApplication, NewReview, NewUser, PaymentStatus, Review, Role, Scholarship,
        ScholarshipCategory, UpdateScholarshipRequest, UpdateUserRequest, User,
    },
    query::ScholarshipQuery,
};

pub(crate) mod documents;
mod mongo;

pub use mongo::MongoRepository;

/// StoreError
///
/// Any failure from the document store or from mapping its documents.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("store did not return an ObjectId for the inserted document")]
    MissingInsertedId,

    #[error("unexpected `{field}` value from the store: {value}")]
    UnexpectedValue { field: &'static str, value: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// UpdateOutcome
///
/// Matched and modified counts of a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

impl UpdateOutcome {
    pub fn found(&self) -> bool {
        self.matched > 0
    }
}

/// ScholarshipSlice
///
/// One window of a catalogue search plus the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ScholarshipSlice {
    pub items: Vec<Scholarship>,
    pub total: u64,
}

/// Repository Trait
///
/// The persistence contract for users, scholarships, applications and reviews.
/// Handlers depend only on this trait, so the MongoDB implementation can be
/// swapped for an in-memory one in tests.
///
/// Identifiers arrive already parsed; turning a malformed id into a 400 is the
/// handler's job. Conditional writes (owner + pending, expected status) are
/// expressed in the store filter so a racing change cannot slip through.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_id(&self, id: ObjectId) -> StoreResult<Option<User>>;
    /// Returns the new id, or `None` when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> StoreResult<Option<String>>;
    async fn update_user_profile(
        &self,
        id: ObjectId,
        patch: UpdateUserRequest,
    ) -> StoreResult<UpdateOutcome>;
    async fn assign_student_id(&self, id: ObjectId, student_id: &str)
    -> StoreResult<UpdateOutcome>;
    async fn list_users(&self, role: Option<Role>) -> StoreResult<Vec<User>>;
    async fn set_user_role(&self, id: ObjectId, role: Role) -> StoreResult<UpdateOutcome>;
    async fn delete_user(&self, id: ObjectId) -> StoreResult<bool>;
    async fn count_users(&self) -> StoreResult<u64>;

    // --- Scholarships ---
    async fn search_scholarships(&self, query: &ScholarshipQuery) -> StoreResult<ScholarshipSlice>;
    /// Lowest application fee first.
    async fn cheapest_scholarships(&self, limit: i64) -> StoreResult<Vec<Scholarship>>;
    async fn scholarships_in_category(
        &self,
        category: ScholarshipCategory,
        exclude: Option<ObjectId>,
        limit: i64,
    ) -> StoreResult<Vec<Scholarship>>;
    async fn find_scholarship(&self, id: ObjectId) -> StoreResult<Option<Scholarship>>;
    async fn insert_scholarship(
        &self,
        scholarship: CreateScholarshipRequest,
        posted_at: DateTime<Utc>,
    ) -> StoreResult<String>;
    async fn update_scholarship(
        &self,
        id: ObjectId,
        patch: UpdateScholarshipRequest,
    ) -> StoreResult<UpdateOutcome>;
    async fn delete_scholarship(&self, id: ObjectId) -> StoreResult<bool>;
    async fn count_scholarships(&self) -> StoreResult<u64>;

    // --- Applications ---
    async fn insert_application(&self, application: NewApplication) -> StoreResult<String>;
    async fn find_application(&self, id: ObjectId) -> StoreResult<Option<Application>>;
    async fn applications_by_email(&self, email: &str) -> StoreResult<Vec<Application>>;
    async fn all_applications(&self) -> StoreResult<Vec<Application>>;
    /// Writes `to` only while the stored status still equals `from`.
    async fn transition_application_status(
        &self,
        id: ObjectId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> StoreResult<UpdateOutcome>;
    async fn set_application_feedback(
        &self,
        id: ObjectId,
        feedback: &str,
    ) -> StoreResult<UpdateOutcome>;
    async fn set_payment_status(
        &self,
        id: ObjectId,
        status: PaymentStatus,
    ) -> StoreResult<UpdateOutcome>;
    /// Applies the patch only if `owner` owns the application and it is pending.
    async fn update_pending_application(
        &self,
        id: ObjectId,
        owner: &str,
        patch: ApplicantDetails,
    ) -> StoreResult<UpdateOutcome>;
    /// Deletes only if `owner` owns the application and it is pending.
    async fn delete_pending_application(&self, id: ObjectId, owner: &str) -> StoreResult<bool>;
    async fn count_applications(&self) -> StoreResult<u64>;
    async fn paid_applications(&self) -> StoreResult<Vec<Application>>;
    /// Count desc, then key asc.
    async fn group_applications(
        &self,
        by: GroupField,
        limit: Option<i64>,
    ) -> StoreResult<Vec<GroupCount>>;
    async fn application_dates_since(
        &self,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<DateTime<Utc>>>;

    // --- Reviews ---
    async fn insert_review(&self, review: NewReview) -> StoreResult<String>;
    async fn find_review(&self, id: ObjectId) -> StoreResult<Option<Review>>;
    /// Newest first.
    async fn reviews_for_scholarship(&self, scholarship_id: &str) -> StoreResult<Vec<Review>>;
    async fn reviews_by_email(&self, email: &str) -> StoreResult<Vec<Review>>;
    async fn all_reviews(&self) -> StoreResult<Vec<Review>>;
    /// Rewrites rating and comment and refreshes the review date, owner only.
    async fn update_own_review(
        &self,
        id: ObjectId,
        owner: &str,
        rating_point: f64,
        review_comment: &str,
        reviewed_at: DateTime<Utc>,
    ) -> StoreResult<UpdateOutcome>;
    async fn delete_review(&self, id: ObjectId) -> StoreResult<bool>;
}

/// RepositoryState
///
/// Shared handle to the persistence layer held in the application state.
pub type RepositoryState = Arc<dyn Repository>;
