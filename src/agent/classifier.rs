use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::agent::traversal::Traversal;
use crate::config::CrawlConfig;
use crate::fetcher::{domain_of, normalize_url, PageFetcher};
use crate::oracle::{Assessment, CourseRecommendation, JudgmentOracle, LinkPurpose};

/// Crawls a target site page by page, accumulating evidence until the
/// oracle is confident enough to commit to a course category.
pub struct SiteClassifier<'a> {
    fetcher: &'a dyn PageFetcher,
    oracle: &'a dyn JudgmentOracle,
    config: &'a CrawlConfig,
}

impl<'a> SiteClassifier<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        oracle: &'a dyn JudgmentOracle,
        config: &'a CrawlConfig,
    ) -> Self {
        Self {
            fetcher,
            oracle,
            config,
        }
    }

    /// Always returns a committed recommendation: a ready verdict from
    /// the crawl, a final post-crawl assessment, a forced decision, or
    /// the hardcoded fallback, in that order.
    pub async fn classify(&self, target: &str) -> CourseRecommendation {
        let base_url = normalize_url(target);
        let domain = domain_of(&base_url).unwrap_or_default();
        info!("Starting course analysis of {}", base_url);

        let mut traversal = Traversal::new(base_url, self.config.max_steps);
        let mut evidence = String::new();
        let mut assessment = Assessment::not_ready();

        while let Some(current) = traversal.next() {
            info!(
                "Step {}/{}: analyzing {}",
                traversal.steps_taken(),
                self.config.max_steps,
                current
            );

            let page = self.fetcher.fetch(&current).await;
            if !page.text.is_empty() {
                let _ = write!(evidence, "\n\n--- Content from {} ---\n", current);
                if !page.title.is_empty() {
                    let _ = writeln!(evidence, "Page title: {}", page.title);
                }
                let _ = write!(evidence, "{}", page.text);
            }

            let candidates: Vec<String> = page
                .links
                .iter()
                .take(self.config.link_batch_limit)
                .cloned()
                .collect();
            if !candidates.is_empty() {
                match self
                    .oracle
                    .filter_links(&candidates, &domain, &LinkPurpose::CourseRelevance)
                    .await
                {
                    Ok(selected) => {
                        // Only links we actually offered may enter the
                        // frontier, whatever the oracle replied with.
                        let admitted = selected
                            .into_iter()
                            .filter(|link| candidates.contains(link))
                            .filter(|link| traversal.admit(link.clone()))
                            .count();
                        debug!("Queued {} new links from {}", admitted, current);
                    }
                    Err(e) => warn!("Link filtering failed for {}: {}", current, e),
                }
            }

            assessment = match self.oracle.assess(&evidence).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!(
                        "Assessment failed at step {}: {}",
                        traversal.steps_taken(),
                        e
                    );
                    Assessment::not_ready()
                }
            };

            if assessment.ready {
                info!(
                    "Oracle is ready after {} pages ({} frontier entries unexplored)",
                    traversal.steps_taken(),
                    traversal.frontier_len()
                );
                break;
            }

            if self.config.page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
            }
        }

        if let Some(recommendation) = assessment.into_recommendation() {
            return recommendation;
        }

        // The frontier can drain before the oracle commits; one last
        // pass over the full evidence covers that exit path.
        info!("Running final assessment over all collected evidence");
        if let Ok(verdict) = self.oracle.assess(&evidence).await {
            if let Some(recommendation) = verdict.into_recommendation() {
                return recommendation;
            }
        }

        info!("Forcing a recommendation from limited evidence");
        match self.oracle.force_assess(&evidence).await {
            Ok(recommendation) => recommendation,
            Err(e) => {
                error!("Forced recommendation failed: {}", e);
                CourseRecommendation::fallback()
            }
        }
    }
}
