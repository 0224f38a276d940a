use async_trait::async_trait;
use bson::{DateTime as BsonDateTime, Document, doc, oid::ObjectId, to_bson};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    results::UpdateResult,
};

use super::{
    Repository, ScholarshipSlice, StoreError, StoreResult, UpdateOutcome,
    documents::{ApplicationDocument, ReviewDocument, ScholarshipDocument, UserDocument},
};
use crate::{
    analytics::{GroupField, group_pipeline, read_group_row},
    models::{
        ApplicantDetails, Application, ApplicationStatus, CreateScholarshipRequest, GroupCount,
        NewApplication, NewReview, NewUser, PaymentStatus, Review, Role, Scholarship,
        ScholarshipCategory, UpdateScholarshipRequest, UpdateUserRequest, User,
    },
    query::ScholarshipQuery,
};

const DUPLICATE_KEY: i32 = 11000;

/// MongoRepository
///
/// The concrete `Repository`, backed by the `users`, `scholarships`,
/// `applications` and `reviews` collections of one database.
#[derive(Clone)]
pub struct MongoRepository {
    users: Collection<UserDocument>,
    scholarships: Collection<ScholarshipDocument>,
    applications: Collection<ApplicationDocument>,
    reviews: Collection<ReviewDocument>,
}

impl MongoRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection("users"),
            scholarships: db.collection("scholarships"),
            applications: db.collection("applications"),
            reviews: db.collection("reviews"),
        }
    }

    /// ensure_indexes
    ///
    /// Creates the unique index on `users.email`. Idempotent, run at startup.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(index).await?;
        Ok(())
    }
}

fn outcome(result: UpdateResult) -> UpdateOutcome {
    UpdateOutcome {
        matched: result.matched_count,
        modified: result.modified_count,
    }
}

fn inserted_hex(id: bson::Bson) -> StoreResult<String> {
    id.as_object_id()
        .map(|oid| oid.to_hex())
        .ok_or(StoreError::MissingInsertedId)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

/// Drains a cursor into API models.
async fn collect<D, T>(cursor: mongodb::Cursor<D>) -> StoreResult<Vec<T>>
where
    D: serde::de::DeserializeOwned + Send + Sync + Unpin,
    T: From<D>,
{
    let docs: Vec<D> = cursor.try_collect().await?;
    Ok(docs.into_iter().map(T::from).collect())
}

/// `$set` document holding only the populated fields of a patch.
fn set_fields<T: serde::Serialize>(patch: &T) -> StoreResult<Document> {
    match to_bson(patch)? {
        bson::Bson::Document(fields) => Ok(fields),
        _ => Ok(Document::new()),
    }
}

#[async_trait]
impl Repository for MongoRepository {
    // --- Users ---

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let found = self.users.find_one(doc! { "email": email }).await?;
        Ok(found.map(User::from))
    }

    async fn find_user_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        let found = self.users.find_one(doc! { "_id": id }).await?;
        Ok(found.map(User::from))
    }

    /// insert_user
    ///
    /// The unique email index turns a racing duplicate into `Ok(None)`.
    async fn insert_user(&self, user: NewUser) -> StoreResult<Option<String>> {
        match self.users.insert_one(UserDocument::from(user)).await {
            Ok(result) => inserted_hex(result.inserted_id).map(Some),
            Err(err) if is_duplicate_key(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_user_profile(
        &self,
        id: ObjectId,
        patch: UpdateUserRequest,
    ) -> StoreResult<UpdateOutcome> {
        let fields = set_fields(&patch)?;
        let result = self
            .users
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        Ok(outcome(result))
    }

    async fn assign_student_id(
        &self,
        id: ObjectId,
        student_id: &str,
    ) -> StoreResult<UpdateOutcome> {
        let result = self
            .users
            .update_one(
                doc! { "_id": id, "studentId": { "$exists": false } },
                doc! { "$set": { "studentId": student_id } },
            )
            .await?;
        Ok(outcome(result))
    }

    async fn list_users(&self, role: Option<Role>) -> StoreResult<Vec<User>> {
        let filter = match role {
            Some(role) => doc! { "role": role.as_str() },
            None => Document::new(),
        };
        collect(self.users.find(filter).await?).await
    }

    async fn set_user_role(&self, id: ObjectId, role: Role) -> StoreResult<UpdateOutcome> {
        let result = self
            .users
            .update_one(doc! { "_id": id }, doc! { "$set": { "role": role.as_str() } })
            .await?;
        Ok(outcome(result))
    }

    async fn delete_user(&self, id: ObjectId) -> StoreResult<bool> {
        let result = self.users.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count_users(&self) -> StoreResult<u64> {
        Ok(self.users.count_documents(doc! {}).await?)
    }

    // --- Scholarships ---

    /// search_scholarships
    ///
    /// Runs the filter twice: once windowed for the page, once as a count.
    async fn search_scholarships(&self, query: &ScholarshipQuery) -> StoreResult<ScholarshipSlice> {
        let filter = query.filter();
        let total = self.scholarships.count_documents(filter.clone()).await?;

        let mut find = self
            .scholarships
            .find(filter)
            .skip(query.skip())
            .limit(query.limit() as i64);
        if let Some(sort) = query.sort() {
            find = find.sort(sort);
        }
        let items = collect(find.await?).await?;

        Ok(ScholarshipSlice { items, total })
    }

    async fn cheapest_scholarships(&self, limit: i64) -> StoreResult<Vec<Scholarship>> {
        let cursor = self
            .scholarships
            .find(doc! {})
            .sort(doc! { "applicationFees": 1 })
            .limit(limit)
            .await?;
        collect(cursor).await
    }

    async fn scholarships_in_category(
        &self,
        category: ScholarshipCategory,
        exclude: Option<ObjectId>,
        limit: i64,
    ) -> StoreResult<Vec<Scholarship>> {
        let mut filter = doc! { "scholarshipCategory": category.as_str() };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }
        let cursor = self.scholarships.find(filter).limit(limit).await?;
        collect(cursor).await
    }

    async fn find_scholarship(&self, id: ObjectId) -> StoreResult<Option<Scholarship>> {
        let found = self.scholarships.find_one(doc! { "_id": id }).await?;
        Ok(found.map(Scholarship::from))
    }

    async fn insert_scholarship(
        &self,
        scholarship: CreateScholarshipRequest,
        posted_at: DateTime<Utc>,
    ) -> StoreResult<String> {
        let document = ScholarshipDocument::from_request(scholarship, posted_at);
        let result = self.scholarships.insert_one(document).await?;
        inserted_hex(result.inserted_id)
    }

    async fn update_scholarship(
        &self,
        id: ObjectId,
        patch: UpdateScholarshipRequest,
    ) -> StoreResult<UpdateOutcome> {
        let fields = set_fields(&patch)?;
        let result = self
            .scholarships
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        Ok(outcome(result))
    }

    async fn delete_scholarship(&self, id: ObjectId) -> StoreResult<bool> {
        let result = self.scholarships.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count_scholarships(&self) -> StoreResult<u64> {
        Ok(self.scholarships.count_documents(doc! {}).await?)
    }

    // --- Applications ---

    async fn insert_application(&self, application: NewApplication) -> StoreResult<String> {
        let result = self
            .applications
            .insert_one(ApplicationDocument::from(application))
            .await?;
        inserted_hex(result.inserted_id)
    }

    async fn find_application(&self, id: ObjectId) -> StoreResult<Option<Application>> {
        let found = self.applications.find_one(doc! { "_id": id }).await?;
        Ok(found.map(Application::from))
    }

    async fn applications_by_email(&self, email: &str) -> StoreResult<Vec<Application>> {
        collect(self.applications.find(doc! { "userEmail": email }).await?).await
    }

    async fn all_applications(&self) -> StoreResult<Vec<Application>> {
        collect(self.applications.find(doc! {}).await?).await
    }

    async fn transition_application_status(
        &self,
        id: ObjectId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> StoreResult<UpdateOutcome> {
        let result = self
            .applications
            .update_one(
                doc! { "_id": id, "applicationStatus": from.as_str() },
                doc! { "$set": { "applicationStatus": to.as_str() } },
            )
            .await?;
        Ok(outcome(result))
    }

    async fn set_application_feedback(
        &self,
        id: ObjectId,
        feedback: &str,
    ) -> StoreResult<UpdateOutcome> {
        let result = self
            .applications
            .update_one(doc! { "_id": id }, doc! { "$set": { "feedback": feedback } })
            .await?;
        Ok(outcome(result))
    }

    async fn set_payment_status(
        &self,
        id: ObjectId,
        status: PaymentStatus,
    ) -> StoreResult<UpdateOutcome> {
        let result = self
            .applications
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "paymentStatus": status.as_str() } },
            )
            .await?;
        Ok(outcome(result))
    }

    async fn update_pending_application(
        &self,
        id: ObjectId,
        owner: &str,
        patch: ApplicantDetails,
    ) -> StoreResult<UpdateOutcome> {
        let fields = set_fields(&patch)?;
        let result = self
            .applications
            .update_one(
                doc! {
                    "_id": id,
                    "userEmail": owner,
                    "applicationStatus": ApplicationStatus::Pending.as_str(),
                },
                doc! { "$set": fields },
            )
            .await?;
        Ok(outcome(result))
    }

    async fn delete_pending_application(&self, id: ObjectId, owner: &str) -> StoreResult<bool> {
        let result = self
            .applications
            .delete_one(doc! {
                "_id": id,
                "userEmail": owner,
                "applicationStatus": ApplicationStatus::Pending.as_str(),
            })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn count_applications(&self) -> StoreResult<u64> {
        Ok(self.applications.count_documents(doc! {}).await?)
    }

    async fn paid_applications(&self) -> StoreResult<Vec<Application>> {
        let filter = doc! { "paymentStatus": PaymentStatus::Paid.as_str() };
        collect(self.applications.find(filter).await?).await
    }

    async fn group_applications(
        &self,
        by: GroupField,
        limit: Option<i64>,
    ) -> StoreResult<Vec<GroupCount>> {
        let cursor = self.applications.aggregate(group_pipeline(by, limit)).await?;
        let rows: Vec<Document> = cursor.try_collect().await?;

        rows.into_iter()
            .map(read_group_row)
            .collect()
    }

    async fn application_dates_since(
        &self,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<DateTime<Utc>>> {
        let filter = doc! { "applicationDate": { "$gte": BsonDateTime::from_chrono(since) } };
        let docs: Vec<ApplicationDocument> =
            self.applications.find(filter).await?.try_collect().await?;
        Ok(docs
            .into_iter()
            .map(|doc| doc.application_date.to_chrono())
            .collect())
    }

    // --- Reviews ---

    async fn insert_review(&self, review: NewReview) -> StoreResult<String> {
        let result = self.reviews.insert_one(ReviewDocument::from(review)).await?;
        inserted_hex(result.inserted_id)
    }

    async fn find_review(&self, id: ObjectId) -> StoreResult<Option<Review>> {
        let found = self.reviews.find_one(doc! { "_id": id }).await?;
        Ok(found.map(Review::from))
    }

    async fn reviews_for_scholarship(&self, scholarship_id: &str) -> StoreResult<Vec<Review>> {
        let cursor = self
            .reviews
            .find(doc! { "scholarshipId": scholarship_id })
            .sort(doc! { "reviewDate": -1 })
            .await?;
        collect(cursor).await
    }

    async fn reviews_by_email(&self, email: &str) -> StoreResult<Vec<Review>> {
        collect(self.reviews.find(doc! { "userEmail": email }).await?).await
    }

    async fn all_reviews(&self) -> StoreResult<Vec<Review>> {
        collect(self.reviews.find(doc! {}).await?).await
    }

    async fn update_own_review(
        &self,
        id: ObjectId,
        owner: &str,
        rating_point: f64,
        review_comment: &str,
        reviewed_at: DateTime<Utc>,
    ) -> StoreResult<UpdateOutcome> {
        let result = self
            .reviews
            .update_one(
                doc! { "_id": id, "userEmail": owner },
                doc! { "$set": {
                    "ratingPoint": rating_point,
                    "reviewComment": review_comment,
                    "reviewDate": BsonDateTime::from_chrono(reviewed_at),
                } },
            )
            .await?;
        Ok(outcome(result))
    }

    async fn delete_review(&self, id: ObjectId) -> StoreResult<bool> {
        let result = self.reviews.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
