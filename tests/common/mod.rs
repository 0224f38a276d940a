#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use scholar_stream::{
    AppConfig, AppState, MockPaymentGateway, PaymentState,
    analytics::GroupField,
    auth::issue_token,
    create_router,
    models::{
        ApplicantDetails, Application, ApplicationStatus, CreateScholarshipRequest, GroupCount,
        NewApplication, NewReview, NewUser, PaymentStatus, Review, Role, Scholarship,
        ScholarshipCategory, UpdateScholarshipRequest, UpdateUserRequest, User,
    },
    query::{ScholarshipQuery, SortKey, SortOrder},
    repository::{Repository, RepositoryState, ScholarshipSlice, StoreResult, UpdateOutcome},
};
use serde_json::Value;
use tower::ServiceExt;

// --- In-Memory Repository ---

/// Vec-backed stand-in for `MongoRepository`. Applies the same conditional
/// write rules so handler tests see the same matched/modified counts.
#[derive(Default)]
pub struct InMemoryRepository {
    pub users: Mutex<Vec<User>>,
    pub scholarships: Mutex<Vec<Scholarship>>,
    pub applications: Mutex<Vec<Application>>,
    pub reviews: Mutex<Vec<Review>>,
}

fn outcome(matched: bool, modified: bool) -> UpdateOutcome {
    UpdateOutcome {
        matched: matched as u64,
        modified: (matched && modified) as u64,
    }
}

fn set<T: PartialEq>(slot: &mut T, value: Option<T>, changed: &mut bool) {
    if let Some(value) = value {
        if *slot != value {
            *slot = value;
            *changed = true;
        }
    }
}

fn set_opt<T: PartialEq>(slot: &mut Option<T>, value: Option<T>, changed: &mut bool) {
    if value.is_some() && *slot != value {
        *slot = value;
        *changed = true;
    }
}

fn apply_applicant(target: &mut ApplicantDetails, patch: ApplicantDetails) -> bool {
    let mut changed = false;
    set_opt(&mut target.phone, patch.phone, &mut changed);
    set_opt(&mut target.address, patch.address, &mut changed);
    set_opt(&mut target.gender, patch.gender, &mut changed);
    set_opt(&mut target.ssc_result, patch.ssc_result, &mut changed);
    set_opt(&mut target.hsc_result, patch.hsc_result, &mut changed);
    set_opt(&mut target.study_gap, patch.study_gap, &mut changed);
    changed
}

impl InMemoryRepository {
    pub fn seed_user(&self, email: &str, role: Role) -> String {
        let id = ObjectId::new().to_hex();
        self.users.lock().unwrap().push(User {
            id: id.clone(),
            name: Some(email.split('@').next().unwrap_or_default().to_string()),
            email: email.to_string(),
            photo_url: None,
            role,
            created_at: Some(Utc::now()),
            student_id: None,
        });
        id
    }

    pub fn seed_scholarship(
        &self,
        name: &str,
        university: &str,
        country: &str,
        category: ScholarshipCategory,
        application_fees: f64,
    ) -> String {
        let id = ObjectId::new().to_hex();
        self.scholarships
            .lock()
            .unwrap()
            .push(sample_scholarship(&id, name, university, country, category, application_fees));
        id
    }

    pub fn seed_application(
        &self,
        owner: &str,
        university: &str,
        status: ApplicationStatus,
        payment: PaymentStatus,
    ) -> String {
        let id = ObjectId::new().to_hex();
        let mut application = sample_application(owner, status, payment);
        application.id = id.clone();
        application.university_name = university.to_string();
        self.applications.lock().unwrap().push(application);
        id
    }

    pub fn seed_review(&self, scholarship_id: &str, owner: &str, review_date: DateTime<Utc>) -> String {
        let id = ObjectId::new().to_hex();
        self.reviews.lock().unwrap().push(Review {
            id: id.clone(),
            scholarship_id: scholarship_id.to_string(),
            scholarship_name: None,
            university_name: None,
            user_name: None,
            user_email: owner.to_string(),
            user_image: None,
            rating_point: 4.0,
            review_comment: "Helpful staff".to_string(),
            review_date,
        });
        id
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn application(&self, id: &str) -> Option<Application> {
        self.applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn review(&self, id: &str) -> Option<Review> {
        self.reviews.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    // --- Users ---

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.user(email))
    }

    async fn find_user_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        let id = id.to_hex();
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<Option<String>> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let id = ObjectId::new().to_hex();
        users.push(User {
            id: id.clone(),
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
            role: user.role,
            created_at: Some(user.created_at),
            student_id: Some(user.student_id),
        });
        Ok(Some(id))
    }

    async fn update_user_profile(
        &self,
        id: ObjectId,
        patch: UpdateUserRequest,
    ) -> StoreResult<UpdateOutcome> {
        let id = id.to_hex();
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(outcome(false, false));
        };
        let mut changed = false;
        set_opt(&mut user.name, patch.name, &mut changed);
        set_opt(&mut user.photo_url, patch.photo_url, &mut changed);
        Ok(outcome(true, changed))
    }

    async fn assign_student_id(
        &self,
        id: ObjectId,
        student_id: &str,
    ) -> StoreResult<UpdateOutcome> {
        let id = id.to_hex();
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|u| u.id == id && u.student_id.is_none())
        {
            Some(user) => {
                user.student_id = Some(student_id.to_string());
                Ok(outcome(true, true))
            }
            None => Ok(outcome(false, false)),
        }
    }

    async fn list_users(&self, role: Option<Role>) -> StoreResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect())
    }

    async fn set_user_role(&self, id: ObjectId, role: Role) -> StoreResult<UpdateOutcome> {
        let id = id.to_hex();
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(outcome(false, false));
        };
        let changed = user.role != role;
        user.role = role;
        Ok(outcome(true, changed))
    }

    async fn delete_user(&self, id: ObjectId) -> StoreResult<bool> {
        let id = id.to_hex();
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn count_users(&self) -> StoreResult<u64> {
        Ok(self.users.lock().unwrap().len() as u64)
    }

    // --- Scholarships ---

    async fn search_scholarships(&self, query: &ScholarshipQuery) -> StoreResult<ScholarshipSlice> {
        let needle = query.search().map(str::to_lowercase);
        let mut items: Vec<Scholarship> = self
            .scholarships
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                needle.as_deref().is_none_or(|n| {
                    [&s.scholarship_name, &s.university_name, &s.degree]
                        .iter()
                        .any(|field| field.to_lowercase().contains(n))
                }) && query.country().is_none_or(|c| s.university_country == c)
                    && query.category().is_none_or(|c| s.scholarship_category == c)
            })
            .cloned()
            .collect();

        if let Some((key, order)) = query.ordering() {
            match key {
                SortKey::ApplicationFees => {
                    items.sort_by(|a, b| a.application_fees.total_cmp(&b.application_fees))
                }
                SortKey::PostDate => {
                    items.sort_by(|a, b| a.scholarship_post_date.cmp(&b.scholarship_post_date))
                }
            }
            if order == SortOrder::Desc {
                items.reverse();
            }
        }

        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(query.skip() as usize)
            .take(query.limit() as usize)
            .collect();
        Ok(ScholarshipSlice { items, total })
    }

    async fn cheapest_scholarships(&self, limit: i64) -> StoreResult<Vec<Scholarship>> {
        let mut items = self.scholarships.lock().unwrap().clone();
        items.sort_by(|a, b| a.application_fees.total_cmp(&b.application_fees));
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    async fn scholarships_in_category(
        &self,
        category: ScholarshipCategory,
        exclude: Option<ObjectId>,
        limit: i64,
    ) -> StoreResult<Vec<Scholarship>> {
        let exclude = exclude.map(|id| id.to_hex());
        Ok(self
            .scholarships
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.scholarship_category == category && Some(&s.id) != exclude.as_ref())
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_scholarship(&self, id: ObjectId) -> StoreResult<Option<Scholarship>> {
        let id = id.to_hex();
        Ok(self
            .scholarships
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn insert_scholarship(
        &self,
        req: CreateScholarshipRequest,
        posted_at: DateTime<Utc>,
    ) -> StoreResult<String> {
        let id = ObjectId::new().to_hex();
        self.scholarships.lock().unwrap().push(Scholarship {
            id: id.clone(),
            scholarship_name: req.scholarship_name,
            university_name: req.university_name,
            university_image: req.university_image,
            university_country: req.university_country,
            university_city: req.university_city,
            university_world_rank: req.university_world_rank,
            subject_category: req.subject_category,
            scholarship_category: req.scholarship_category,
            degree: req.degree,
            tuition_fees: req.tuition_fees,
            application_fees: req.application_fees,
            service_charge: req.service_charge,
            application_deadline: req.application_deadline,
            scholarship_post_date: Some(posted_at),
            posted_user_email: req.posted_user_email,
            scholarship_description: req.scholarship_description,
        });
        Ok(id)
    }

    async fn update_scholarship(
        &self,
        id: ObjectId,
        patch: UpdateScholarshipRequest,
    ) -> StoreResult<UpdateOutcome> {
        let id = id.to_hex();
        let mut scholarships = self.scholarships.lock().unwrap();
        let Some(s) = scholarships.iter_mut().find(|s| s.id == id) else {
            return Ok(outcome(false, false));
        };
        let mut changed = false;
        set(&mut s.scholarship_name, patch.scholarship_name, &mut changed);
        set(&mut s.university_name, patch.university_name, &mut changed);
        set_opt(&mut s.university_image, patch.university_image, &mut changed);
        set(&mut s.university_country, patch.university_country, &mut changed);
        set_opt(&mut s.university_city, patch.university_city, &mut changed);
        set_opt(&mut s.university_world_rank, patch.university_world_rank, &mut changed);
        set_opt(&mut s.subject_category, patch.subject_category, &mut changed);
        set(&mut s.scholarship_category, patch.scholarship_category, &mut changed);
        set(&mut s.degree, patch.degree, &mut changed);
        set_opt(&mut s.tuition_fees, patch.tuition_fees, &mut changed);
        set(&mut s.application_fees, patch.application_fees, &mut changed);
        set(&mut s.service_charge, patch.service_charge, &mut changed);
        set_opt(&mut s.application_deadline, patch.application_deadline, &mut changed);
        set_opt(
            &mut s.scholarship_description,
            patch.scholarship_description,
            &mut changed,
        );
        Ok(outcome(true, changed))
    }

    async fn delete_scholarship(&self, id: ObjectId) -> StoreResult<bool> {
        let id = id.to_hex();
        let mut scholarships = self.scholarships.lock().unwrap();
        let before = scholarships.len();
        scholarships.retain(|s| s.id != id);
        Ok(scholarships.len() < before)
    }

    async fn count_scholarships(&self) -> StoreResult<u64> {
        Ok(self.scholarships.lock().unwrap().len() as u64)
    }

    // --- Applications ---

    async fn insert_application(&self, application: NewApplication) -> StoreResult<String> {
        let id = ObjectId::new().to_hex();
        let req = application.request;
        self.applications.lock().unwrap().push(Application {
            id: id.clone(),
            scholarship_id: req.scholarship_id,
            scholarship_name: req.scholarship_name,
            university_name: req.university_name,
            university_country: req.university_country,
            scholarship_category: req.scholarship_category,
            degree: req.degree,
            application_fees: req.application_fees,
            service_charge: req.service_charge,
            user_name: req.user_name,
            user_email: application.user_email,
            applicant: req.applicant,
            application_status: application.application_status,
            payment_status: application.payment_status,
            feedback: application.feedback,
            application_date: application.application_date,
        });
        Ok(id)
    }

    async fn find_application(&self, id: ObjectId) -> StoreResult<Option<Application>> {
        Ok(self.application(&id.to_hex()))
    }

    async fn applications_by_email(&self, email: &str) -> StoreResult<Vec<Application>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_email == email)
            .cloned()
            .collect())
    }

    async fn all_applications(&self) -> StoreResult<Vec<Application>> {
        Ok(self.applications.lock().unwrap().clone())
    }

    async fn transition_application_status(
        &self,
        id: ObjectId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> StoreResult<UpdateOutcome> {
        let id = id.to_hex();
        let mut applications = self.applications.lock().unwrap();
        match applications
            .iter_mut()
            .find(|a| a.id == id && a.application_status == from)
        {
            Some(application) => {
                application.application_status = to;
                Ok(outcome(true, from != to))
            }
            None => Ok(outcome(false, false)),
        }
    }

    async fn set_application_feedback(
        &self,
        id: ObjectId,
        feedback: &str,
    ) -> StoreResult<UpdateOutcome> {
        let id = id.to_hex();
        let mut applications = self.applications.lock().unwrap();
        let Some(application) = applications.iter_mut().find(|a| a.id == id) else {
            return Ok(outcome(false, false));
        };
        let changed = application.feedback != feedback;
        application.feedback = feedback.to_string();
        Ok(outcome(true, changed))
    }

    async fn set_payment_status(
        &self,
        id: ObjectId,
        status: PaymentStatus,
    ) -> StoreResult<UpdateOutcome> {
        let id = id.to_hex();
        let mut applications = self.applications.lock().unwrap();
        let Some(application) = applications.iter_mut().find(|a| a.id == id) else {
            return Ok(outcome(false, false));
        };
        let changed = application.payment_status != status;
        application.payment_status = status;
        Ok(outcome(true, changed))
    }

    async fn update_pending_application(
        &self,
        id: ObjectId,
        owner: &str,
        patch: ApplicantDetails,
    ) -> StoreResult<UpdateOutcome> {
        let id = id.to_hex();
        let mut applications = self.applications.lock().unwrap();
        match applications.iter_mut().find(|a| {
            a.id == id && a.user_email == owner && a.application_status == ApplicationStatus::Pending
        }) {
            Some(application) => {
                let changed = apply_applicant(&mut application.applicant, patch);
                Ok(outcome(true, changed))
            }
            None => Ok(outcome(false, false)),
        }
    }

    async fn delete_pending_application(&self, id: ObjectId, owner: &str) -> StoreResult<bool> {
        let id = id.to_hex();
        let mut applications = self.applications.lock().unwrap();
        let before = applications.len();
        applications.retain(|a| {
            !(a.id == id
                && a.user_email == owner
                && a.application_status == ApplicationStatus::Pending)
        });
        Ok(applications.len() < before)
    }

    async fn count_applications(&self) -> StoreResult<u64> {
        Ok(self.applications.lock().unwrap().len() as u64)
    }

    async fn paid_applications(&self) -> StoreResult<Vec<Application>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.payment_status == PaymentStatus::Paid)
            .cloned()
            .collect())
    }

    async fn group_applications(
        &self,
        by: GroupField,
        limit: Option<i64>,
    ) -> StoreResult<Vec<GroupCount>> {
        let mut counts: BTreeMap<Option<String>, i64> = BTreeMap::new();
        for application in self.applications.lock().unwrap().iter() {
            let key = match by {
                GroupField::University => Some(application.university_name.clone()),
                GroupField::Category => application
                    .scholarship_category
                    .map(|c| c.as_str().to_string()),
                GroupField::ScholarshipName => application.scholarship_name.clone(),
            };
            *counts.entry(key).or_default() += 1;
        }

        // BTreeMap iteration is key-ascending; a stable sort keeps that for ties.
        let mut rows: Vec<GroupCount> = counts
            .into_iter()
            .map(|(name, count)| GroupCount { name, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        if let Some(limit) = limit {
            rows.truncate(limit.max(0) as usize);
        }
        Ok(rows)
    }

    async fn application_dates_since(
        &self,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<DateTime<Utc>>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.application_date)
            .filter(|date| *date >= since)
            .collect())
    }

    // --- Reviews ---

    async fn insert_review(&self, review: NewReview) -> StoreResult<String> {
        let id = ObjectId::new().to_hex();
        let req = review.request;
        self.reviews.lock().unwrap().push(Review {
            id: id.clone(),
            scholarship_id: req.scholarship_id,
            scholarship_name: req.scholarship_name,
            university_name: req.university_name,
            user_name: req.user_name,
            user_email: review.user_email,
            user_image: req.user_image,
            rating_point: req.rating_point,
            review_comment: req.review_comment,
            review_date: review.review_date,
        });
        Ok(id)
    }

    async fn find_review(&self, id: ObjectId) -> StoreResult<Option<Review>> {
        Ok(self.review(&id.to_hex()))
    }

    async fn reviews_for_scholarship(&self, scholarship_id: &str) -> StoreResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.scholarship_id == scholarship_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.review_date.cmp(&a.review_date));
        Ok(reviews)
    }

    async fn reviews_by_email(&self, email: &str) -> StoreResult<Vec<Review>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_email == email)
            .cloned()
            .collect())
    }

    async fn all_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.reviews.lock().unwrap().clone())
    }

    async fn update_own_review(
        &self,
        id: ObjectId,
        owner: &str,
        rating_point: f64,
        review_comment: &str,
        reviewed_at: DateTime<Utc>,
    ) -> StoreResult<UpdateOutcome> {
        let id = id.to_hex();
        let mut reviews = self.reviews.lock().unwrap();
        match reviews
            .iter_mut()
            .find(|r| r.id == id && r.user_email == owner)
        {
            Some(review) => {
                review.rating_point = rating_point;
                review.review_comment = review_comment.to_string();
                review.review_date = reviewed_at;
                Ok(outcome(true, true))
            }
            None => Ok(outcome(false, false)),
        }
    }

    async fn delete_review(&self, id: ObjectId) -> StoreResult<bool> {
        let id = id.to_hex();
        let mut reviews = self.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        Ok(reviews.len() < before)
    }
}

// --- Fixtures ---

pub fn sample_scholarship(
    id: &str,
    name: &str,
    university: &str,
    country: &str,
    category: ScholarshipCategory,
    application_fees: f64,
) -> Scholarship {
    Scholarship {
        id: id.to_string(),
        scholarship_name: name.to_string(),
        university_name: university.to_string(),
        university_image: None,
        university_country: country.to_string(),
        university_city: None,
        university_world_rank: None,
        subject_category: None,
        scholarship_category: category,
        degree: "Masters".to_string(),
        tuition_fees: None,
        application_fees,
        service_charge: 10.0,
        application_deadline: None,
        scholarship_post_date: Some(Utc::now()),
        posted_user_email: None,
        scholarship_description: None,
    }
}

pub fn sample_application(
    owner: &str,
    status: ApplicationStatus,
    payment: PaymentStatus,
) -> Application {
    Application {
        id: ObjectId::new().to_hex(),
        scholarship_id: ObjectId::new().to_hex(),
        scholarship_name: Some("Global Excellence Award".to_string()),
        university_name: "University of Oxford".to_string(),
        university_country: Some("United Kingdom".to_string()),
        scholarship_category: Some(ScholarshipCategory::MeritBased),
        degree: Some("Masters".to_string()),
        application_fees: 50.0,
        service_charge: 5.5,
        user_name: None,
        user_email: owner.to_string(),
        applicant: ApplicantDetails {
            phone: Some("+8801700000000".to_string()),
            ..ApplicantDetails::default()
        },
        application_status: status,
        payment_status: payment,
        feedback: String::new(),
        application_date: Utc::now(),
    }
}

// --- Router Harness ---

pub const STUDENT: &str = "student@example.com";
pub const OTHER_STUDENT: &str = "other@example.com";
pub const MODERATOR: &str = "moderator@example.com";
pub const ADMIN: &str = "admin@example.com";

/// The full router over an `InMemoryRepository`, driven with `oneshot`.
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryRepository>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_payments(Arc::new(MockPaymentGateway::new()))
    }

    pub fn with_payments(payments: PaymentState) -> Self {
        let repo = Arc::new(InMemoryRepository::default());
        let config = AppConfig::default();
        let state = AppState {
            repo: repo.clone() as RepositoryState,
            payments,
            config: config.clone(),
        };
        Self {
            router: create_router(state),
            repo,
            config,
        }
    }

    /// Seeds one user per role.
    pub fn with_accounts() -> Self {
        let app = Self::new();
        app.repo.seed_user(STUDENT, Role::Student);
        app.repo.seed_user(OTHER_STUDENT, Role::Student);
        app.repo.seed_user(MODERATOR, Role::Moderator);
        app.repo.seed_user(ADMIN, Role::Admin);
        app
    }

    pub fn token_for(&self, email: &str) -> String {
        issue_token(email, &self.config.jwt_secret, Utc::now()).expect("token signs")
    }

    /// Sends a request, optionally as `as_email`, and returns the status and JSON body
    /// (`Value::Null` for non-JSON bodies).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        as_email: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(email) = as_email {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token_for(email)),
            );
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
