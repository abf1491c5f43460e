use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::FetcherConfig;
use crate::fetcher::{FetchedPage, PageFetcher};
use async_trait::async_trait;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/121.0",
];

/// Tags whose text never describes the site itself.
const EXCLUDED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "noscript"];

const DOCUMENT_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".ppt", ".pptx", ".xls", ".xlsx", ".csv", ".zip", ".rar", ".tar",
    ".gz", ".7z", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico", ".mp3", ".mp4",
    ".avi", ".mov",
];

/// Prefix a scheme when missing and canonicalize through the URL parser.
/// Unparseable input passes through with the scheme prefixed so the
/// fetcher can fail soft on it instead of the caller aborting.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    match Url::parse(&candidate) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => candidate,
    }
}

pub fn domain_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

/// Non-HTML resource links (documents, images, archives, media) that a
/// crawl should never spend a step on.
pub fn is_document_link(url: &str) -> bool {
    let path = Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_else(|_| url.to_lowercase());
    DOCUMENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

pub struct HttpFetcher {
    client: Client,
    max_attempts: usize,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_attempts: config.max_attempts.max(1),
        }
    }

    async fn robust_get(&self, url: &str) -> Option<String> {
        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                // Jittered backoff between attempts, polite to the target
                tokio::time::sleep(Duration::from_millis(fastrand::u64(1000..3000))).await;
            }

            let user_agent = USER_AGENTS[fastrand::usize(..USER_AGENTS.len())];
            let mut request = self
                .client
                .get(url)
                .header("User-Agent", user_agent)
                .header(
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                )
                .header("Accept-Language", "en-US,en;q=0.9");

            // A referer sometimes gets past blanket bot blocks
            if attempt > 0 {
                request = request.header("Referer", "https://www.google.com/");
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => match response.text().await {
                    Ok(body) => {
                        debug!("Fetched {} bytes from {}", body.len(), url);
                        return Some(body);
                    }
                    Err(e) => warn!("Failed to read body from {}: {}", url, e),
                },
                Ok(response) => {
                    warn!(
                        "Attempt {}/{}: HTTP {} from {}",
                        attempt + 1,
                        self.max_attempts,
                        response.status(),
                        url
                    );
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt + 1,
                        self.max_attempts,
                        url,
                        e
                    );
                }
            }
        }

        None
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchedPage {
        let normalized = normalize_url(url);
        match self.robust_get(&normalized).await {
            Some(body) => {
                let page = parse_page(&body, &normalized);
                debug!(
                    "Extracted {} chars and {} same-domain links from {}",
                    page.text.len(),
                    page.links.len(),
                    normalized
                );
                page
            }
            None => {
                warn!("Giving up on {}, treating as empty page", normalized);
                FetchedPage::empty(&normalized)
            }
        }
    }
}

/// Pull title, readable text, and same-domain links out of an HTML body.
pub fn parse_page(html: &str, url: &str) -> FetchedPage {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title").unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let mut raw_text = String::new();
    collect_text(document.root_element(), &mut raw_text);
    let text = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");

    let links = extract_same_domain_links(&document, url);

    FetchedPage {
        url: url.to_string(),
        title,
        text,
        links,
    }
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) => {
                if EXCLUDED_TAGS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, out);
                }
            }
            _ => {}
        }
    }
}

fn extract_same_domain_links(document: &Html, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    let base_host = base.host_str().map(|h| h.to_string());

    let link_selector = Selector::parse("a[href]").unwrap();
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        // Fragments point back into pages already discovered
        resolved.set_fragment(None);
        if resolved.host_str().map(|h| h.to_string()) != base_host {
            continue;
        }
        let link = resolved.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}
