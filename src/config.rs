use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub fetcher: FetcherConfig,
    pub oracle: OracleConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Bounds shared by the classification crawl and the contact harvest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    pub max_steps: usize,
    pub link_batch_limit: usize,
    pub max_selected_links: usize,
    pub max_contacts: usize,
    pub page_delay_ms: u64,
    pub rate_limit_retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    pub timeout_seconds: u64,
    pub max_attempts: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    pub model: String,
    pub api_base: String,
    pub timeout_seconds: u64,
    pub call_delay_ms: u64,
    pub evidence_char_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub cleaned_directory: String,
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            fetcher: FetcherConfig {
                timeout_seconds: 15,
                max_attempts: 3,
            },
            oracle: OracleConfig {
                model: "gemini-2.5-flash".to_string(),
                api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                timeout_seconds: 30,
                call_delay_ms: 1000,
                evidence_char_limit: 8000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "outputs".to_string(),
                cleaned_directory: "cleaned_outputs".to_string(),
                pretty_json: true,
            },
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_steps: 15,
            link_batch_limit: 20,
            max_selected_links: 8,
            max_contacts: 10,
            page_delay_ms: 2000,
            rate_limit_retry_delay_ms: 5000,
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_crawl_bounds() {
        let config = Config::default();
        assert_eq!(config.crawl.max_steps, 15);
        assert_eq!(config.crawl.max_contacts, 10);
        assert_eq!(config.crawl.max_selected_links, 8);
    }

    #[test]
    fn config_yaml_round_trip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.oracle.model, config.oracle.model);
        assert_eq!(parsed.crawl.link_batch_limit, config.crawl.link_batch_limit);
    }
}
