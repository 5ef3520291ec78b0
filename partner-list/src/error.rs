use thiserror::Error;

/// Why a partner load failed.
///
/// Both variants surface the same way to the pagination layer: the source has no value,
/// so the list behaves as if it were empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The request could not be sent, returned a non-success status, or the body could not be read.
    #[error("partner request failed: {0}")]
    Transport(String),
    /// The body was not JSON, or did not match the expected partner shape.
    #[error("partner response was malformed: {0}")]
    Malformed(String),
}

/// Invalid construction parameters for a [`crate::PartnerSource`] or [`crate::Paginator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
    /// The endpoint is not a valid absolute URL.
    #[error("invalid partner endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The endpoint as configured.
        endpoint: String,
        /// The parser's complaint.
        reason: String,
    },
    /// The HTTP client could not be initialised.
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}
