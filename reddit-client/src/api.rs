use crate::metrics::{MetricsCollector, RequestMetrics, RequestOutcome};
use crate::transport::{HttpTransport, RawResponse, Transport};
use hotwords_core::{ApiConfig, CoreError, Cursor, Item, ListingError, Page, MAX_PAGE_SIZE};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, warn};

const HOT_ENDPOINT: &str = "hot";
const ABOUT_ENDPOINT: &str = "about";

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListing {
    pub data: RedditListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingData {
    /// Kept untyped: a malformed child only loses its title, never the page.
    pub children: Vec<serde_json::Value>,
    #[serde(default)]
    pub after: Option<String>,
}

fn item_from_child(child: &serde_json::Value) -> Item {
    Item {
        title: child
            .get("data")
            .and_then(|data| data.get("title"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
    }
}

impl From<RedditListing> for Page {
    fn from(listing: RedditListing) -> Self {
        Self {
            items: listing.data.children.iter().map(item_from_child).collect(),
            next_cursor: listing.data.after.and_then(Cursor::new),
        }
    }
}

/// Classified outcome of one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult {
    Ok {
        items: Vec<Item>,
        next_cursor: Option<Cursor>,
    },
    /// Non-success status, redirect, or unreadable body. Deliberately not split further.
    NotFound(ListingError),
    TransportError(ListingError),
}

impl PageResult {
    pub fn outcome(&self) -> RequestOutcome {
        match self {
            PageResult::Ok { .. } => RequestOutcome::Success,
            PageResult::NotFound(_) => RequestOutcome::NotFound,
            PageResult::TransportError(_) => RequestOutcome::TransportError,
        }
    }

    pub fn into_page(self) -> Result<Page, ListingError> {
        match self {
            PageResult::Ok { items, next_cursor } => Ok(Page { items, next_cursor }),
            PageResult::NotFound(e) | PageResult::TransportError(e) => Err(e),
        }
    }
}

impl From<Page> for PageResult {
    fn from(page: Page) -> Self {
        PageResult::Ok {
            items: page.items,
            next_cursor: page.next_cursor,
        }
    }
}

/// Issues single listing and metadata requests. Never retries, never follows redirects.
#[derive(Debug)]
pub struct ListingClient<T = HttpTransport> {
    transport: T,
    base_url: String,
    metrics: MetricsCollector,
}

impl ListingClient<HttpTransport> {
    pub fn from_config(config: &ApiConfig) -> Result<Self, CoreError> {
        Ok(Self::new(HttpTransport::new(config)?, &config.base_url))
    }
}

impl<T: Transport> ListingClient<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            metrics: MetricsCollector::new(),
        }
    }

    pub fn hot_url(&self, resource_id: &str) -> String {
        format!("{}/{}/hot.json", self.base_url, resource_id)
    }

    pub fn about_url(&self, resource_id: &str) -> String {
        format!("{}/{}/about.json", self.base_url, resource_id)
    }

    /// Fetches one page of `resource_id`'s hot listing.
    ///
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE`. An empty `resource_id` is
    /// classified as `NotFound` without touching the network.
    pub async fn fetch_page(
        &self,
        resource_id: &str,
        cursor: Option<&Cursor>,
        page_size: u32,
    ) -> PageResult {
        let url = self.hot_url(resource_id);
        if resource_id.is_empty() {
            warn!("Refusing to fetch a listing for an empty subreddit name");
            return PageResult::NotFound(ListingError::Status { url, status: 404 });
        }

        let mut query = vec![("limit", page_size.clamp(1, MAX_PAGE_SIZE).to_string())];
        if let Some(cursor) = cursor {
            query.push(("after", cursor.to_string()));
        }

        info!("Fetching r/{} hot page (after: {:?})", resource_id, cursor);
        let start_time = Instant::now();
        let response = self.transport.get(&url, &query).await;
        let status_code = response.as_ref().ok().map(|r| r.status);

        let result = match response {
            Ok(raw) => match classify_listing(&url, raw) {
                Ok(page) => {
                    debug!(
                        "r/{}: {} item(s), next cursor {:?}",
                        resource_id,
                        page.items.len(),
                        page.next_cursor
                    );
                    page.into()
                }
                Err(e) => {
                    warn!("r/{} page rejected: {}", resource_id, e);
                    PageResult::NotFound(e)
                }
            },
            Err(e) => {
                warn!("r/{} page request failed: {}", resource_id, e);
                PageResult::TransportError(e)
            }
        };

        self.record(HOT_ENDPOINT, status_code, start_time, result.outcome())
            .await;
        result
    }

    /// Reads `data.<field>` from the subreddit's about document.
    ///
    /// Any failure, including a missing or non-integer field, yields `0`.
    pub async fn get_metadata_field(&self, resource_id: &str, field: &str) -> u64 {
        let url = self.about_url(resource_id);
        if resource_id.is_empty() {
            warn!("Refusing to fetch metadata for an empty subreddit name");
            return 0;
        }

        let start_time = Instant::now();
        let response = self.transport.get(&url, &[]).await;
        let status_code = response.as_ref().ok().map(|r| r.status);

        let (outcome, value) = match response {
            Ok(raw) => match read_metadata_field(&url, raw, field) {
                Ok(value) => (RequestOutcome::Success, value),
                Err(e) => {
                    warn!("r/{} metadata rejected: {}", resource_id, e);
                    (RequestOutcome::NotFound, 0)
                }
            },
            Err(e) => {
                warn!("r/{} metadata request failed: {}", resource_id, e);
                (RequestOutcome::TransportError, 0)
            }
        };

        self.record(ABOUT_ENDPOINT, status_code, start_time, outcome)
            .await;
        value
    }

    pub async fn number_of_subscribers(&self, resource_id: &str) -> u64 {
        self.get_metadata_field(resource_id, "subscribers").await
    }

    pub async fn get_metrics(&self) -> crate::metrics::ApiMetrics {
        self.metrics.get_metrics().await
    }

    pub async fn export_metrics(&self) -> Result<String, serde_json::Error> {
        self.metrics.export_metrics().await
    }

    async fn record(
        &self,
        endpoint: &str,
        status_code: Option<u16>,
        start_time: Instant,
        outcome: RequestOutcome,
    ) {
        self.metrics
            .record_request(RequestMetrics {
                endpoint: endpoint.to_string(),
                status_code,
                response_time: start_time.elapsed(),
                outcome,
            })
            .await;
    }
}

fn check_status(url: &str, raw: &RawResponse) -> Result<(), ListingError> {
    match raw.status {
        200 => Ok(()),
        300..=399 => Err(ListingError::Redirect {
            url: url.to_string(),
            status: raw.status,
            location: raw.location.clone(),
        }),
        status => Err(ListingError::Status {
            url: url.to_string(),
            status,
        }),
    }
}

fn classify_listing(url: &str, raw: RawResponse) -> Result<Page, ListingError> {
    check_status(url, &raw)?;

    let listing: RedditListing =
        serde_json::from_str(&raw.body).map_err(|e| ListingError::MalformedBody {
            url: url.to_string(),
            details: e.to_string(),
        })?;

    Ok(listing.into())
}

fn read_metadata_field(url: &str, raw: RawResponse, field: &str) -> Result<u64, ListingError> {
    check_status(url, &raw)?;

    let document: serde_json::Value =
        serde_json::from_str(&raw.body).map_err(|e| ListingError::MalformedBody {
            url: url.to_string(),
            details: e.to_string(),
        })?;

    document
        .get("data")
        .and_then(|data| data.get(field))
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| ListingError::MalformedBody {
            url: url.to_string(),
            details: format!("missing integer field data.{}", field),
        })
}
