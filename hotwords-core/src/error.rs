use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Pagination aborted for r/{resource} after {pages_fetched} page(s): {reason}")]
    PaginationAborted {
        resource: String,
        pages_fetched: usize,
        reason: String,
    },

    #[error("Cancelled while paginating r/{resource} after {pages_fetched} page(s)")]
    Cancelled {
        resource: String,
        pages_fetched: usize,
    },
}

/// Outcome of a single request that did not produce a usable page.
///
/// `Transport` and `Timeout` mean the request never completed. Every other
/// variant is a protocol failure: the server answered, but not with a listing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("Transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Redirected away from {url} (status {status})")]
    Redirect {
        url: String,
        status: u16,
        location: Option<String>,
    },

    #[error("Malformed response body for {url}: {details}")]
    MalformedBody { url: String, details: String },
}

impl ListingError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ListingError::Transport { .. } | ListingError::Timeout { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
