#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub url: String,
    pub title: String,
    pub text: String,
    /// Absolute URLs restricted to the fetched page's network domain,
    /// deduplicated in document order.
    pub links: Vec<String>,
}

impl FetchedPage {
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }
}
