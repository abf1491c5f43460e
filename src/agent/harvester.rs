use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::agent::traversal::Traversal;
use crate::config::CrawlConfig;
use crate::fetcher::{domain_of, is_document_link, normalize_url, PageFetcher};
use crate::oracle::{Contact, CourseCategory, JudgmentOracle, LinkPurpose, OracleError};

/// Mines a bounded set of same-domain pages for named individuals with
/// contact details relevant to selling the given course category.
///
/// Same traversal skeleton as the classifier, different policy: no
/// evidence accumulation (each page is mined independently) and the
/// run also ends once the contact cap is reached. An empty result is a
/// valid outcome; there is no forced fallback here.
pub struct ContactHarvester<'a> {
    fetcher: &'a dyn PageFetcher,
    oracle: &'a dyn JudgmentOracle,
    config: &'a CrawlConfig,
}

impl<'a> ContactHarvester<'a> {
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

    pub async fn harvest(&self, target: &str, course: CourseCategory) -> Vec<Contact> {
        let base_url = normalize_url(target);
        let domain = domain_of(&base_url).unwrap_or_default();
        info!("Harvesting {} contacts from {}", course, base_url);

        let mut traversal = Traversal::new(base_url, self.config.max_steps);
        let mut contacts: Vec<Contact> = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        while contacts.len() < self.config.max_contacts {
            let Some(current) = traversal.next() else {
                break;
            };
            debug!(
                "Step {}/{}: mining {}",
                traversal.steps_taken(),
                self.config.max_steps,
                current
            );

            let page = self.fetcher.fetch(&current).await;

            if !page.text.is_empty() {
                for contact in self.extract_with_retry(&page.text, course).await {
                    if !contact.has_channel() {
                        continue;
                    }
                    if contacts.len() >= self.config.max_contacts {
                        break;
                    }
                    if seen.insert(contact.dedup_key()) {
                        info!(
                            "Added contact: {} ({})",
                            contact.name,
                            contact.title.as_deref().unwrap_or("no title")
                        );
                        contacts.push(contact);
                    }
                }
            }

            let candidates: Vec<String> = page
                .links
                .iter()
                .filter(|link| !is_document_link(link))
                .take(self.config.link_batch_limit)
                .cloned()
                .collect();
            if !candidates.is_empty() {
                match self
                    .oracle
                    .filter_links(&candidates, &domain, &LinkPurpose::ContactDiscovery(course))
                    .await
                {
                    Ok(selected) => {
                        // Only links we actually offered may enter the
                        // frontier, whatever the oracle replied with.
                        for link in selected {
                            if candidates.contains(&link) {
                                traversal.admit(link);
                            }
                        }
                    }
                    Err(e) => warn!("Link filtering failed for {}: {}", current, e),
                }
            }

            if self.config.page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
            }
        }

        info!(
            "Harvest complete: {} contacts from {} pages",
            contacts.len(),
            traversal.steps_taken()
        );
        contacts
    }

    /// One bounded retry on a rate-limit signal; any other failure
    /// gives up on this page only.
    async fn extract_with_retry(&self, page_text: &str, course: CourseCategory) -> Vec<Contact> {
        match self.oracle.extract_contacts(page_text, course).await {
            Ok(found) => found,
            Err(OracleError::RateLimited) => {
                warn!(
                    "Oracle rate limited, retrying once after {}ms",
                    self.config.rate_limit_retry_delay_ms
                );
                tokio::time::sleep(Duration::from_millis(self.config.rate_limit_retry_delay_ms))
                    .await;
                match self.oracle.extract_contacts(page_text, course).await {
                    Ok(found) => found,
                    Err(e) => {
                        warn!("Contact extraction failed after retry: {}", e);
                        Vec::new()
                    }
                }
            }
            Err(e) => {
                warn!("Contact extraction failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::{contact, test_config, StubFetcher, StubOracle};
    use std::sync::atomic::Ordering;

    fn two_page_site() -> StubFetcher {
        let mut fetcher = StubFetcher::default();
        fetcher.add_page_with_text(
            "https://example.edu/",
            "Example University",
            "Computer Science Department, Faculty: Jane Doe, jane@example.edu",
            &["https://example.edu/faculty", "https://example.edu/sports"],
        );
        fetcher.add_page_with_text(
            "https://example.edu/faculty",
            "Faculty",
            "Jane Doe, Head of Department, jane@example.edu",
            &[],
        );
        fetcher
    }

    #[tokio::test]
    async fn finds_the_faculty_contact() {
        let fetcher = two_page_site();
        let oracle = StubOracle {
            selected_links: Some(vec!["https://example.edu/faculty".to_string()]),
            ..StubOracle::default()
        };
        oracle.script_contacts(Ok(vec![contact(
            "Jane Doe",
            Some("jane@example.edu"),
            None,
        )]));
        let config = test_config();

        let contacts = ContactHarvester::new(&fetcher, &oracle, &config)
            .harvest("example.edu", CourseCategory::Programming)
            .await;

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "Jane Doe");
        assert_eq!(contacts[0].email.as_deref(), Some("jane@example.edu"));
    }

    #[tokio::test]
    async fn repeated_contacts_are_deduplicated() {
        let fetcher = two_page_site();
        let oracle = StubOracle::default();
        // Both pages surface the same person
        oracle.script_contacts(Ok(vec![contact(
            "Jane Doe",
            Some("jane@example.edu"),
            None,
        )]));
        oracle.script_contacts(Ok(vec![
            contact("Jane Doe", Some("JANE@example.edu"), None),
            contact("John Smith", None, Some("+1-123-456-7890")),
        ]));
        let config = test_config();

        let contacts = ContactHarvester::new(&fetcher, &oracle, &config)
            .harvest("example.edu", CourseCategory::Programming)
            .await;

        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].name, "Jane Doe");
        assert_eq!(contacts[1].name, "John Smith");
    }

    #[tokio::test]
    async fn contact_cap_is_respected() {
        let fetcher = two_page_site();
        let oracle = StubOracle::default();
        let batch: Vec<Contact> = (0..14)
            .map(|i| {
                contact(
                    &format!("Person {}", i),
                    Some(&format!("p{}@example.edu", i)),
                    None,
                )
            })
            .collect();
        oracle.script_contacts(Ok(batch));
        let config = test_config();

        let contacts = ContactHarvester::new(&fetcher, &oracle, &config)
            .harvest("example.edu", CourseCategory::Sales)
            .await;

        assert_eq!(contacts.len(), config.max_contacts);
    }

    #[tokio::test]
    async fn unreachable_contacts_are_dropped() {
        let fetcher = two_page_site();
        let oracle = StubOracle::default();
        oracle.script_contacts(Ok(vec![
            contact("Ghost Person", None, None),
            contact("Real Person", Some("real@example.edu"), None),
        ]));
        let config = test_config();

        let contacts = ContactHarvester::new(&fetcher, &oracle, &config)
            .harvest("example.edu", CourseCategory::Programming)
            .await;

        assert_eq!(contacts.len(), 1);
        assert!(contacts[0].has_channel());
    }

    #[tokio::test]
    async fn rate_limit_gets_exactly_one_retry() {
        let fetcher = two_page_site();
        let oracle = StubOracle::default();
        oracle.script_contacts(Err(OracleError::RateLimited));
        oracle.script_contacts(Ok(vec![contact(
            "Jane Doe",
            Some("jane@example.edu"),
            None,
        )]));
        let config = test_config();

        let contacts = ContactHarvester::new(&fetcher, &oracle, &config)
            .harvest("example.edu", CourseCategory::Programming)
            .await;

        assert_eq!(contacts.len(), 1);
        assert_eq!(oracle.extract_calls.load(Ordering::SeqCst), 3); // retry + second page
    }

    #[tokio::test]
    async fn second_rate_limit_gives_up_on_the_page_only() {
        let fetcher = two_page_site();
        let oracle = StubOracle::default();
        // Homepage: limited twice. Faculty page: succeeds.
        oracle.script_contacts(Err(OracleError::RateLimited));
        oracle.script_contacts(Err(OracleError::RateLimited));
        oracle.script_contacts(Ok(vec![contact(
            "Jane Doe",
            Some("jane@example.edu"),
            None,
        )]));
        let config = test_config();

        let contacts = ContactHarvester::new(&fetcher, &oracle, &config)
            .harvest("example.edu", CourseCategory::Programming)
            .await;

        assert_eq!(contacts.len(), 1);
        assert_eq!(oracle.extract_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn document_links_never_reach_the_frontier() {
        let mut fetcher = StubFetcher::default();
        fetcher.add_page_with_text(
            "https://example.edu/",
            "Home",
            "see our brochure",
            &[
                "https://example.edu/brochure.pdf",
                "https://example.edu/faculty",
            ],
        );
        let oracle = StubOracle::default(); // passes every candidate through
        let config = test_config();

        ContactHarvester::new(&fetcher, &oracle, &config)
            .harvest("example.edu", CourseCategory::Programming)
            .await;

        let fetched = fetcher.fetched_urls.lock().unwrap().clone();
        assert!(fetched.contains(&"https://example.edu/faculty".to_string()));
        assert!(!fetched.iter().any(|u| u.ends_with(".pdf")));
    }

    #[tokio::test]
    async fn invented_link_selections_are_never_mined() {
        let fetcher = two_page_site();
        let oracle = StubOracle {
            hallucinated_links: vec!["https://evil.example/staff".to_string()],
            ..StubOracle::default()
        };
        let config = test_config();

        ContactHarvester::new(&fetcher, &oracle, &config)
            .harvest("example.edu", CourseCategory::Programming)
            .await;

        let fetched = fetcher.fetched_urls.lock().unwrap().clone();
        assert!(fetched.contains(&"https://example.edu/faculty".to_string()));
        assert!(!fetched.contains(&"https://evil.example/staff".to_string()));
    }

    #[tokio::test]
    async fn empty_site_yields_an_empty_list() {
        let fetcher = StubFetcher::default();
        let oracle = StubOracle::default();
        let config = test_config();

        let contacts = ContactHarvester::new(&fetcher, &oracle, &config)
            .harvest("unreachable.example", CourseCategory::Sales)
            .await;

        assert!(contacts.is_empty());
    }
}
