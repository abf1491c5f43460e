pub mod gemini;
pub mod json_extract;
pub mod prompts;
pub mod types;

pub use gemini::GeminiOracle;
pub use types::{
    Assessment, Contact, CourseCategory, CourseRecommendation, LinkPurpose, OracleError,
};

use async_trait::async_trait;

/// The LLM-backed decision service behind the two crawl loops.
///
/// Every capability fails closed: a transport or parse problem comes
/// back as an `OracleError` and callers degrade to "not ready", an
/// empty selection, or an empty contact list. The one exception is
/// `force_assess`, whose callers substitute a hardcoded fallback so a
/// committed recommendation always reaches the user.
#[async_trait]
pub trait JudgmentOracle: Send + Sync {
    /// Judges whether the accumulated evidence suffices to classify
    /// the site.
    async fn assess(&self, evidence: &str) -> Result<Assessment, OracleError>;

    /// Prunes a batch of candidate links down to the few most likely
    /// to carry relevant content (at most ~8).
    async fn filter_links(
        &self,
        candidates: &[String],
        domain: &str,
        purpose: &LinkPurpose,
    ) -> Result<Vec<String>, OracleError>;

    /// Mines one page's text for named individuals relevant to selling
    /// the given course category.
    async fn extract_contacts(
        &self,
        page_text: &str,
        course: CourseCategory,
    ) -> Result<Vec<Contact>, OracleError>;

    /// Non-refusable classification: always returns a committed course.
    async fn force_assess(&self, evidence: &str) -> Result<CourseRecommendation, OracleError>;
}
