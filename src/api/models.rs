//! Records and drafts exchanged with the REST API.
//!
//! Dates are kept as the strings the API emits; the admin views only
//! display them.

use serde::{Deserialize, Serialize};

use super::error::{ApiError, Result};

/// A CRUD collection exposed under `/api`.
pub trait Resource {
    /// Collection path, e.g. `/api/articles`.
    const PATH: &'static str;
    /// Shape returned by list/detail.
    type Record: serde::de::DeserializeOwned + Send;
    /// Shape sent on create/update.
    type Draft: Serialize + Validate + Sync;
}

/// Required-field checks run before a draft is sent.
pub trait Validate {
    /// Reject drafts the API would refuse.
    fn validate(&self) -> Result<()>;
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::MissingField(field));
    }
    Ok(())
}

/// Acknowledgement body returned by mutating endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Articles
// ─────────────────────────────────────────────────────────────────────────────

/// Articles collection.
#[derive(Debug)]
pub enum Articles {}

/// A published article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Article create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub author_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Validate for ArticleDraft {
    fn validate(&self) -> Result<()> {
        require("title", &self.title)?;
        require("content", &self.content)
    }
}

impl Resource for Articles {
    const PATH: &'static str = "/api/articles";
    type Record = Article;
    type Draft = ArticleDraft;
}

// ─────────────────────────────────────────────────────────────────────────────
// Promotional events
// ─────────────────────────────────────────────────────────────────────────────

/// Promotional events collection.
#[derive(Debug)]
pub enum Events {}

/// A promotional event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionalEvent {
    pub id: i64,
    pub event_name: String,
    #[serde(default)]
    pub event_description: Option<String>,
    #[serde(default)]
    pub event_start_date: Option<String>,
    #[serde(default)]
    pub event_end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_upcoming: bool,
}

/// Event create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventDraft {
    pub event_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_upcoming: Option<bool>,
}

impl Validate for EventDraft {
    fn validate(&self) -> Result<()> {
        require("event_name", &self.event_name)
    }
}

impl Resource for Events {
    const PATH: &'static str = "/api/events";
    type Record = PromotionalEvent;
    type Draft = EventDraft;
}

// ─────────────────────────────────────────────────────────────────────────────
// Solutions
// ─────────────────────────────────────────────────────────────────────────────

/// Solutions (portfolio) collection.
#[derive(Debug)]
pub enum Solutions {}

/// A delivered customer solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub id: i64,
    pub customer_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub key_features: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Solution create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolutionDraft {
    pub customer_id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_features: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Validate for SolutionDraft {
    fn validate(&self) -> Result<()> {
        require("title", &self.title)
    }
}

impl Resource for Solutions {
    const PATH: &'static str = "/api/solutions";
    type Record = Solution;
    type Draft = SolutionDraft;
}

// ─────────────────────────────────────────────────────────────────────────────
// Customer feedback
// ─────────────────────────────────────────────────────────────────────────────

/// Customer feedback collection.
#[derive(Debug)]
pub enum Feedbacks {}

/// A customer's feedback entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub customer_id: i64,
    #[serde(default)]
    pub feedback_text: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub feedback_date: Option<String>,
}

/// Feedback create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedbackDraft {
    pub customer_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Validate for FeedbackDraft {
    fn validate(&self) -> Result<()> {
        match self.rating {
            Some(r) if !(1..=5).contains(&r) => Err(ApiError::InvalidField {
                field: "rating",
                reason: "must be between 1 and 5",
            }),
            _ => Ok(()),
        }
    }
}

impl Resource for Feedbacks {
    const PATH: &'static str = "/api/feedbacks";
    type Record = Feedback;
    type Draft = FeedbackDraft;
}

// ─────────────────────────────────────────────────────────────────────────────
// Contact inquiries
// ─────────────────────────────────────────────────────────────────────────────

/// Contact inquiries collection.
#[derive(Debug)]
pub enum Inquiries {}

/// A contact-form inquiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_details: Option<String>,
    #[serde(default)]
    pub company_location: Option<String>,
    #[serde(default)]
    pub interested_product: Option<String>,
    #[serde(default)]
    pub current_solution: Option<String>,
    #[serde(default)]
    pub inquiry_reason: Option<String>,
    #[serde(default)]
    pub submission_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Inquiry create payload; updates only change `status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InquiryDraft {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interested_product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inquiry_reason: Option<String>,
}

impl Validate for InquiryDraft {
    fn validate(&self) -> Result<()> {
        require("full_name", &self.full_name)?;
        require("email", &self.email)
    }
}

impl Resource for Inquiries {
    const PATH: &'static str = "/api/contacts";
    type Record = Inquiry;
    type Draft = InquiryDraft;
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Customer,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::User, Self::Customer];

    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Customer => "customer",
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The signed-in user returned by login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// `GET /api/users` wraps the list.
#[derive(Debug, Deserialize)]
pub(crate) struct UserList {
    pub users: Vec<User>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

/// Headline counts for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub total_users: u64,
    pub total_inquiries: u64,
    pub total_articles: u64,
    pub upcoming_events: u64,
}

/// Inquiry count for one status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_requires_title_and_content() {
        let draft = ArticleDraft {
            title: " ".into(),
            content: "body".into(),
            ..ArticleDraft::default()
        };
        assert!(matches!(draft.validate(), Err(ApiError::MissingField("title"))));

        let draft = ArticleDraft {
            title: "Title".into(),
            ..ArticleDraft::default()
        };
        assert!(matches!(draft.validate(), Err(ApiError::MissingField("content"))));
    }

    #[test]
    fn test_feedback_rating_range() {
        let mut draft = FeedbackDraft {
            customer_id: 1,
            rating: Some(6),
            ..FeedbackDraft::default()
        };
        assert!(draft.validate().is_err());
        draft.rating = Some(5);
        assert!(draft.validate().is_ok());
        draft.rating = None;
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_optional_fields_skipped() {
        let draft = EventDraft {
            event_name: "Launch".into(),
            ..EventDraft::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({ "event_name": "Launch" }));
    }

    #[test]
    fn test_user_list_unwraps() {
        let body = r#"{"users":[{"id":1,"username":"a","email":"a@x","role":"admin","created_at":"2025-01-01T00:00:00"}]}"#;
        let list: UserList = serde_json::from_str(body).unwrap();
        assert_eq!(list.users[0].role, Role::Admin);
    }
}
