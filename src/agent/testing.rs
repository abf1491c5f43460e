//! Stub collaborators for exercising the crawl loops without a network
//! or an LLM behind them.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::config::CrawlConfig;
use crate::fetcher::{FetchedPage, PageFetcher};
use crate::oracle::{
    Assessment, Contact, CourseCategory, CourseRecommendation, JudgmentOracle, LinkPurpose,
    OracleError,
};
use async_trait::async_trait;

/// Crawl bounds with the delays zeroed so tests run instantly.
pub fn test_config() -> CrawlConfig {
    CrawlConfig {
        page_delay_ms: 0,
        rate_limit_retry_delay_ms: 0,
        ..CrawlConfig::default()
    }
}

/// Serves canned pages by exact URL; everything else comes back empty,
/// which is exactly how the real fetcher degrades.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, FetchedPage>,
    pub fetch_count: AtomicUsize,
    pub fetched_urls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn add_page(&mut self, url: &str, title: &str, links: &[&str]) {
        self.add_page_with_text(url, title, "placeholder body text", links);
    }

    pub fn add_page_with_text(&mut self, url: &str, title: &str, text: &str, links: &[&str]) {
        self.pages.insert(
            url.to_string(),
            FetchedPage {
                url: url.to_string(),
                title: title.to_string(),
                text: text.to_string(),
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        );
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> FetchedPage {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.fetched_urls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| FetchedPage::empty(url))
    }
}

/// Every fetched page links to one fresh URL, so the frontier never
/// drains and only the step ceiling can end a crawl.
pub struct ChainFetcher {
    domain: String,
    pub fetch_count: AtomicUsize,
}

impl ChainFetcher {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            fetch_count: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PageFetcher for ChainFetcher {
    async fn fetch(&self, url: &str) -> FetchedPage {
        let n = self.fetch_count.fetch_add(1, Ordering::SeqCst);
        FetchedPage {
            url: url.to_string(),
            title: format!("Page {}", n),
            text: format!("generic campus text, page {}", n),
            links: vec![format!("https://{}/page-{}", self.domain, n + 1)],
        }
    }
}

/// Scripted oracle. Assessments and contact batches pop in order;
/// when a script runs dry the oracle stays "not ready" / empty, and
/// the forced call errors unless a forced result is set.
#[derive(Default)]
pub struct StubOracle {
    pub assessments: Mutex<VecDeque<Assessment>>,
    pub forced: Option<CourseRecommendation>,
    /// `None` passes every candidate through; `Some` keeps only the
    /// listed URLs, preserving candidate order.
    pub selected_links: Option<Vec<String>>,
    /// Appended verbatim to every link selection, modelling a reply
    /// that names URLs which were never among the candidates.
    pub hallucinated_links: Vec<String>,
    pub contacts: Mutex<VecDeque<Result<Vec<Contact>, OracleError>>>,
    pub assess_calls: AtomicUsize,
    pub filter_calls: AtomicUsize,
    pub extract_calls: AtomicUsize,
    pub last_evidence: Mutex<String>,
}

impl StubOracle {
    pub fn script_assessment(&self, assessment: Assessment) {
        self.assessments.lock().unwrap().push_back(assessment);
    }

    pub fn script_contacts(&self, batch: Result<Vec<Contact>, OracleError>) {
        self.contacts.lock().unwrap().push_back(batch);
    }
}

#[async_trait]
impl JudgmentOracle for StubOracle {
    async fn assess(&self, evidence: &str) -> Result<Assessment, OracleError> {
        self.assess_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_evidence.lock().unwrap() = evidence.to_string();
        Ok(self
            .assessments
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Assessment::not_ready))
    }

    async fn filter_links(
        &self,
        candidates: &[String],
        _domain: &str,
        _purpose: &LinkPurpose,
    ) -> Result<Vec<String>, OracleError> {
        self.filter_calls.fetch_add(1, Ordering::SeqCst);
        let mut selection = match &self.selected_links {
            Some(accepted) => candidates
                .iter()
                .filter(|c| accepted.contains(c))
                .cloned()
                .collect(),
            None => candidates.to_vec(),
        };
        selection.extend(self.hallucinated_links.iter().cloned());
        Ok(selection)
    }

    async fn extract_contacts(
        &self,
        _page_text: &str,
        _course: CourseCategory,
    ) -> Result<Vec<Contact>, OracleError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.contacts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn force_assess(&self, _evidence: &str) -> Result<CourseRecommendation, OracleError> {
        self.forced
            .clone()
            .ok_or_else(|| OracleError::Transport("stub oracle has no forced result".to_string()))
    }
}

pub fn contact(name: &str, email: Option<&str>, phone: Option<&str>) -> Contact {
    Contact {
        name: name.to_string(),
        title: None,
        email: email.map(|e| e.to_string()),
        phone: phone.map(|p| p.to_string()),
    }
}
