use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseCategory {
    #[serde(rename = "Programming Course")]
    Programming,
    #[serde(rename = "Sales Course")]
    Sales,
}

impl CourseCategory {
    /// Maps the free-form label an LLM returns onto a category.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();
        if lower.contains("programming") {
            Some(Self::Programming)
        } else if lower.contains("sales") {
            Some(Self::Sales)
        } else {
            None
        }
    }
}

impl fmt::Display for CourseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Programming => write!(f, "Programming Course"),
            Self::Sales => write!(f, "Sales Course"),
        }
    }
}

/// The oracle's raw verdict on whether the accumulated evidence is
/// enough to commit to a category.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub ready: bool,
    pub course: Option<CourseCategory>,
    pub reasoning: Option<String>,
    pub confidence: Option<u8>,
}

impl Assessment {
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            course: None,
            reasoning: None,
            confidence: None,
        }
    }

    /// Collapses a ready verdict into a committed recommendation.
    /// A "ready" verdict without a category is treated as not ready.
    pub fn into_recommendation(self) -> Option<CourseRecommendation> {
        if !self.ready {
            return None;
        }
        let course = self.course?;
        Some(CourseRecommendation {
            course,
            reasoning: self
                .reasoning
                .unwrap_or_else(|| "No reasoning provided".to_string()),
            confidence: self.confidence.unwrap_or(0),
        })
    }
}

/// A committed classification. Serialized field names match the
/// persisted result envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecommendation {
    #[serde(rename = "recommended_course")]
    pub course: CourseCategory,
    #[serde(rename = "recommendation_reasoning")]
    pub reasoning: String,
    #[serde(rename = "recommendation_score")]
    pub confidence: u8,
}

impl CourseRecommendation {
    /// Last-resort default when even the forced decision call degrades.
    pub fn fallback() -> Self {
        Self {
            course: CourseCategory::Programming,
            reasoning: "Default recommendation due to limited data and technical error"
                .to_string(),
            confidence: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Contact {
    /// A contact is only worth keeping if it is reachable somehow.
    pub fn has_channel(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }

    pub fn dedup_key(&self) -> (String, String) {
        (
            self.name.trim().to_lowercase(),
            self.email
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
        )
    }
}

/// Which crawl the link-relevance filter is serving; contact discovery
/// uses a per-category persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPurpose {
    CourseRelevance,
    ContactDiscovery(CourseCategory),
}

#[derive(Debug)]
pub enum OracleError {
    RateLimited,
    Transport(String),
    MalformedReply(String),
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "oracle rate limited"),
            Self::Transport(msg) => write!(f, "oracle transport error: {}", msg),
            Self::MalformedReply(msg) => write!(f, "malformed oracle reply: {}", msg),
        }
    }
}

impl std::error::Error for OracleError {}
