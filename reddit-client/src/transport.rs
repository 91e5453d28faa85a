use async_trait::async_trait;
use hotwords_core::{ApiConfig, CoreError, ListingError};
use reqwest::{header, redirect, Client};
use std::time::Duration;
use tracing::{debug, error};

/// What came back over the wire, before any classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            location: None,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
            body: String::new(),
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: 302,
            location: Some(location.into()),
            body: String::new(),
        }
    }
}

/// A single GET. Implementations must not follow redirects and must not retry.
///
/// An `Err` means the request could not be completed at all and should carry
/// [`ListingError::Transport`] or [`ListingError::Timeout`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, ListingError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, ListingError> {
        debug!("GET {} {:?}", url, query);

        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        Ok(RawResponse {
            status,
            location,
            body,
        })
    }
}

fn classify_send_error(url: &str, e: reqwest::Error) -> ListingError {
    error!("Network error for {}: {}", url, e);
    if e.is_timeout() {
        ListingError::Timeout {
            url: url.to_string(),
        }
    } else {
        ListingError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}
