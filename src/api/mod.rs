//! Typed client for the back-office REST API.
//!
//! Articles, events, solutions, feedback, inquiries and users are served by
//! an external API; this module only consumes it. Requests carry the admin
//! [`AuthSession`](crate::auth::AuthSession) cookie when one is present.

mod client;
mod error;
mod models;

pub use client::{ApiClient, DashboardApi, LoginOutcome, ResourceApi, UsersApi};
pub use error::{ApiError, Result};
pub use models::{
    ApiMessage, Article, ArticleDraft, Articles, DashboardOverview, EventDraft, Events, Feedback,
    FeedbackDraft, Feedbacks, Inquiries, Inquiry, InquiryDraft, PromotionalEvent, Resource, Role,
    Solution, SolutionDraft, Solutions, StatusCount, User, UserSummary, Validate,
};
