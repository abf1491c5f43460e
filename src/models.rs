use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    fetcher::HttpFetcher,
    oracle::{Contact, CourseRecommendation, GeminiOracle},
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// The per-target record persisted to the output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteResult {
    pub course_recommendation: CourseRecommendation,
    pub contact_info: ContactInfo,
    pub metadata: ResultMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub institution_name: String,
    pub website_url: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub institution_type: Option<String>,
    pub run_id: String,
    pub processed_at: String,
}

pub struct CliApp {
    pub config: Config,
    pub fetcher: HttpFetcher,
    pub oracle: GeminiOracle,
}

impl CliApp {
    pub fn new(config: Config, gemini_api_key: String) -> Self {
        let fetcher = HttpFetcher::new(&config.fetcher);
        let oracle = GeminiOracle::new(&config.oracle, gemini_api_key)
            .with_max_selected_links(config.crawl.max_selected_links);
        Self {
            config,
            fetcher,
            oracle,
        }
    }
}
