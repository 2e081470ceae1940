//! Content domain models.
//!
//! The set of content types is closed. Each type lives in exactly one
//! well-known document of the `content` collection; [`CONTENT_TABLE`] is the
//! single source of the type ↔ document-name mapping.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of in-app copy categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    HomeScreen,
    SplashScreen,
    SignupMessage,
    LoginMessage,
    AboutUs,
    HelpSupport,
    PrivacyPolicy,
}

/// One row of the type table.
#[derive(Debug)]
pub struct ContentEntry {
    pub kind: ContentType,
    pub doc_name: &'static str,
    pub wire_name: &'static str,
    pub label: &'static str,
}

/// Type ↔ document-name table, in declaration order of [`ContentType`].
pub const CONTENT_TABLE: [ContentEntry; 7] = [
    ContentEntry {
        kind: ContentType::HomeScreen,
        doc_name: "home_screen",
        wire_name: "HOME_SCREEN",
        label: "Home Screen",
    },
    ContentEntry {
        kind: ContentType::SplashScreen,
        doc_name: "splash_screen",
        wire_name: "SPLASH_SCREEN",
        label: "Splash Screen",
    },
    ContentEntry {
        kind: ContentType::SignupMessage,
        doc_name: "signup_message",
        wire_name: "SIGNUP_MESSAGE",
        label: "Signup Message",
    },
    ContentEntry {
        kind: ContentType::LoginMessage,
        doc_name: "login_message",
        wire_name: "LOGIN_MESSAGE",
        label: "Login Message",
    },
    ContentEntry {
        kind: ContentType::AboutUs,
        doc_name: "about_us",
        wire_name: "ABOUT_US",
        label: "About Us",
    },
    ContentEntry {
        kind: ContentType::HelpSupport,
        doc_name: "help_support",
        wire_name: "HELP_SUPPORT",
        label: "Help & Support",
    },
    ContentEntry {
        kind: ContentType::PrivacyPolicy,
        doc_name: "privacy_policy",
        wire_name: "PRIVACY_POLICY",
        label: "Privacy Policy",
    },
];

impl ContentType {
    /// All types, in storage scan order.
    pub const ALL: [ContentType; 7] = [
        ContentType::HomeScreen,
        ContentType::SplashScreen,
        ContentType::SignupMessage,
        ContentType::LoginMessage,
        ContentType::AboutUs,
        ContentType::HelpSupport,
        ContentType::PrivacyPolicy,
    ];

    fn entry(self) -> &'static ContentEntry {
        &CONTENT_TABLE[self as usize]
    }

    /// Storage key of the document holding this type.
    pub fn doc_name(self) -> &'static str {
        self.entry().doc_name
    }

    pub fn as_str(self) -> &'static str {
        self.entry().wire_name
    }

    /// Human-readable label for the dashboard.
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    /// Resolve a storage key back to its type.
    pub fn from_doc_name(name: &str) -> Option<Self> {
        CONTENT_TABLE
            .iter()
            .find(|entry| entry.doc_name == name)
            .map(|entry| entry.kind)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value outside the closed content-type set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CONTENT_TABLE
            .iter()
            .find(|entry| entry.wire_name == s)
            .map(|entry| entry.kind)
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}

/// A content record as stored in its well-known document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Internal id; distinct from the document name.
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: String,
    pub content: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Requested creation of a new content record. Always rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContent {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Fields an operator may change on a content record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ContentUpdate {
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Default::default()
        }
    }
}
