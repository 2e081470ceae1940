//! Initial content documents.

use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::{debug, info};

use super::ContentError;
use crate::documents::{DocumentStore, Fields, collections};
use crate::ids;
use crate::models::content::ContentType;

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: Vec<ContentType>,
    pub skipped: Vec<ContentType>,
}

/// Default title and body for a freshly seeded record.
pub fn default_copy(kind: ContentType) -> (&'static str, &'static str) {
    match kind {
        ContentType::HomeScreen => (
            "Welcome to MoodyMe",
            "Welcome back to MoodyMe! Track your daily mood, discover patterns, and gain \
             valuable insights into your emotional well-being. Start by logging your mood \
             today and build a comprehensive history of your emotional state. Your journey \
             to better mental health starts here!",
        ),
        ContentType::SplashScreen => (
            "MoodyMe - Track Your Emotions",
            "Discover patterns in your emotional well-being with our comprehensive mood \
             tracking app. Start your journey today!",
        ),
        ContentType::SignupMessage => (
            "Join MoodyMe Today",
            "Create your account to start tracking your moods and building better emotional \
             awareness. Your mental health journey begins with a single step.",
        ),
        ContentType::LoginMessage => (
            "Welcome Back",
            "Continue your mood tracking journey. Log in to access your personal dashboard \
             and track your emotional patterns.",
        ),
        ContentType::AboutUs => (
            "About MoodyMe",
            "MoodyMe is a comprehensive mood tracking application designed to help users \
             understand and improve their emotional well-being. Our mission is to provide \
             tools that make mental health monitoring accessible and insightful.",
        ),
        ContentType::HelpSupport => (
            "Help & Support",
            "Need help with MoodyMe? Our support team is here to assist you. Contact us at \
             support@moodyme.com or check out our FAQ section for common questions.",
        ),
        ContentType::PrivacyPolicy => (
            "Privacy Policy",
            "Your privacy is important to us. This privacy policy explains how we collect, \
             use, and protect your personal information when you use MoodyMe.",
        ),
    }
}

/// Create every absent content document. Existing documents are untouched.
pub async fn seed_content(documents: &dyn DocumentStore) -> Result<SeedReport, ContentError> {
    let mut report = SeedReport::default();

    for kind in ContentType::ALL {
        let (title, content) = default_copy(kind);
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let fields = Fields::from_iter([
            ("id".to_string(), json!(ids::document_id())),
            ("type".to_string(), json!(kind.as_str())),
            ("title".to_string(), json!(title)),
            ("content".to_string(), json!(content)),
            ("isActive".to_string(), json!(true)),
            ("createdAt".to_string(), json!(now)),
            ("updatedAt".to_string(), json!(now)),
        ]);

        if documents
            .create_if_absent(collections::CONTENT, kind.doc_name(), fields)
            .await?
        {
            info!(doc_name = kind.doc_name(), "seeded content document");
            report.created.push(kind);
        } else {
            debug!(doc_name = kind.doc_name(), "content document already exists");
            report.skipped.push(kind);
        }
    }

    Ok(report)
}
