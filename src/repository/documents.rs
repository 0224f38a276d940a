//! Stored shapes of the four collections. These carry native `ObjectId` and
//! BSON dates; the API models in `crate::models` carry hex ids and RFC 3339
//! timestamps. Conversion happens only at the repository boundary.

use bson::{DateTime as BsonDateTime, oid::ObjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    ApplicantDetails, Application, ApplicationStatus, CreateScholarshipRequest, NewApplication,
    NewReview, NewUser, PaymentStatus, Review, Role, Scholarship, ScholarshipCategory, User,
};

fn hex(id: Option<ObjectId>) -> String {
    id.map(|oid| oid.to_hex()).unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: hex(doc.id),
            name: doc.name,
            email: doc.email,
            photo_url: doc.photo_url,
            role: doc.role,
            created_at: doc.created_at.map(BsonDateTime::to_chrono),
            student_id: doc.student_id,
        }
    }
}

impl From<NewUser> for UserDocument {
    fn from(user: NewUser) -> Self {
        Self {
            id: None,
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
            role: user.role,
            created_at: Some(BsonDateTime::from_chrono(user.created_at)),
            student_id: Some(user.student_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScholarshipDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub scholarship_name: String,
    pub university_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_image: Option<String>,
    pub university_country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_world_rank: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_category: Option<String>,
    pub scholarship_category: ScholarshipCategory,
    pub degree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition_fees: Option<f64>,
    #[serde(default)]
    pub application_fees: f64,
    #[serde(default)]
    pub service_charge: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_post_date: Option<BsonDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_description: Option<String>,
}

impl From<ScholarshipDocument> for Scholarship {
    fn from(doc: ScholarshipDocument) -> Self {
        Self {
            id: hex(doc.id),
            scholarship_name: doc.scholarship_name,
            university_name: doc.university_name,
            university_image: doc.university_image,
            university_country: doc.university_country,
            university_city: doc.university_city,
            university_world_rank: doc.university_world_rank,
            subject_category: doc.subject_category,
            scholarship_category: doc.scholarship_category,
            degree: doc.degree,
            tuition_fees: doc.tuition_fees,
            application_fees: doc.application_fees,
            service_charge: doc.service_charge,
            application_deadline: doc.application_deadline,
            scholarship_post_date: doc.scholarship_post_date.map(BsonDateTime::to_chrono),
            posted_user_email: doc.posted_user_email,
            scholarship_description: doc.scholarship_description,
        }
    }
}

impl ScholarshipDocument {
    pub fn from_request(req: CreateScholarshipRequest, posted_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
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
            scholarship_post_date: Some(BsonDateTime::from_chrono(posted_at)),
            posted_user_email: req.posted_user_email,
            scholarship_description: req.scholarship_description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplicationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub scholarship_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_name: Option<String>,
    #[serde(default)]
    pub university_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_category: Option<ScholarshipCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default)]
    pub application_fees: f64,
    #[serde(default)]
    pub service_charge: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub user_email: String,
    #[serde(flatten)]
    pub applicant: ApplicantDetails,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub feedback: String,
    pub application_date: BsonDateTime,
}

impl From<ApplicationDocument> for Application {
    fn from(doc: ApplicationDocument) -> Self {
        Self {
            id: hex(doc.id),
            scholarship_id: doc.scholarship_id,
            scholarship_name: doc.scholarship_name,
            university_name: doc.university_name,
            university_country: doc.university_country,
            scholarship_category: doc.scholarship_category,
            degree: doc.degree,
            application_fees: doc.application_fees,
            service_charge: doc.service_charge,
            user_name: doc.user_name,
            user_email: doc.user_email,
            applicant: doc.applicant,
            application_status: doc.application_status,
            payment_status: doc.payment_status,
            feedback: doc.feedback,
            application_date: doc.application_date.to_chrono(),
        }
    }
}

impl From<NewApplication> for ApplicationDocument {
    fn from(new: NewApplication) -> Self {
        let req = new.request;
        Self {
            id: None,
            scholarship_id: req.scholarship_id,
            scholarship_name: req.scholarship_name,
            university_name: req.university_name,
            university_country: req.university_country,
            scholarship_category: req.scholarship_category,
            degree: req.degree,
            application_fees: req.application_fees,
            service_charge: req.service_charge,
            user_name: req.user_name,
            user_email: new.user_email,
            applicant: req.applicant,
            application_status: new.application_status,
            payment_status: new.payment_status,
            feedback: new.feedback,
            application_date: BsonDateTime::from_chrono(new.application_date),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub scholarship_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub user_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
    pub rating_point: f64,
    #[serde(default)]
    pub review_comment: String,
    pub review_date: BsonDateTime,
}

impl From<ReviewDocument> for Review {
    fn from(doc: ReviewDocument) -> Self {
        Self {
            id: hex(doc.id),
            scholarship_id: doc.scholarship_id,
            scholarship_name: doc.scholarship_name,
            university_name: doc.university_name,
            user_name: doc.user_name,
            user_email: doc.user_email,
            user_image: doc.user_image,
            rating_point: doc.rating_point,
            review_comment: doc.review_comment,
            review_date: doc.review_date.to_chrono(),
        }
    }
}

impl From<NewReview> for ReviewDocument {
    fn from(new: NewReview) -> Self {
        let req = new.request;
        Self {
            id: None,
            scholarship_id: req.scholarship_id,
            scholarship_name: req.scholarship_name,
            university_name: req.university_name,
            user_name: req.user_name,
            user_email: new.user_email,
            user_image: req.user_image,
            rating_point: req.rating_point,
            review_comment: req.review_comment,
            review_date: BsonDateTime::from_chrono(new.review_date),
        }
    }
}
