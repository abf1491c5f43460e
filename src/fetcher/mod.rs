pub mod http;
pub mod types;

pub use http::{domain_of, is_document_link, normalize_url, HttpFetcher};
pub use types::FetchedPage;

use async_trait::async_trait;

/// Retrieves a page's rendered text and its same-domain outbound links.
///
/// Implementations fail soft: any transport or parse problem surfaces
/// as an empty page, never as an error the caller has to handle.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchedPage;
}
