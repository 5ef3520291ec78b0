pub(crate) const DEFAULT_PAGE_SIZE: usize = 15;

/// The endpoint [`crate::PartnerSource::http`] fetches from when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://analyze.inflektion.ai/partners.php";

/// Configuration for a [`crate::PartnerList`] and the [`crate::PartnerSource`] behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerListOptions {
    page_size: Option<usize>,
    endpoint: Option<String>,
}

impl PartnerListOptions {
    /// Create new [`PartnerListOptions`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of partners shown per page.
    ///
    /// A size of `0` is rejected when the list is built.
    ///
    /// Default: `15`
    #[track_caller]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the URL the partner list is fetched from with a single `GET`.
    ///
    /// Default: [`DEFAULT_ENDPOINT`]
    #[track_caller]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// The maximum number of partners shown per page.
    ///
    /// Default: `15`
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// The URL the partner list is fetched from.
    ///
    /// Default: [`DEFAULT_ENDPOINT`]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PartnerListOptions::new();
        assert_eq!(options.page_size(), 15);
        assert_eq!(options.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_overrides() {
        let options = PartnerListOptions::new()
            .with_page_size(25)
            .with_endpoint("http://localhost:8080/partners.json");
        assert_eq!(options.page_size(), 25);
        assert_eq!(options.endpoint(), "http://localhost:8080/partners.json");
    }
}
