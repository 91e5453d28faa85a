use crate::api::ListingClient;
use crate::transport::{HttpTransport, Transport};
use futures::stream::{self, Stream, TryStreamExt};
use hotwords_core::{CoreError, Cursor, Item, Page, PaginationConfig};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Walks a hot listing's cursor chain from the first page to the last.
///
/// Holds no per-chain state: every call to [`Paginator::pages`] or
/// [`Paginator::collect_items`] starts over from the first page.
#[derive(Debug)]
pub struct Paginator<T = HttpTransport> {
    client: ListingClient<T>,
    page_size: u32,
    max_pages: usize,
}

struct ChainState {
    cursor: Option<Cursor>,
    pages_fetched: usize,
    finished: bool,
}

impl<T: Transport> Paginator<T> {
    pub fn new(client: ListingClient<T>, config: &PaginationConfig) -> Self {
        Self::with_bounds(client, config.page_size, config.max_pages)
    }

    pub fn with_bounds(client: ListingClient<T>, page_size: u32, max_pages: usize) -> Self {
        Self {
            client,
            page_size,
            max_pages,
        }
    }

    pub fn client(&self) -> &ListingClient<T> {
        &self.client
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Pages in chain order. The stream ends after the first page without a
    /// cursor, or after the first error.
    ///
    /// Cancellation is checked before each request. Reaching `max_pages` with a
    /// cursor still pending is an error, never a silent truncation.
    pub fn pages<'a>(
        &'a self,
        resource_id: &'a str,
        cancel: &'a CancellationToken,
    ) -> impl Stream<Item = Result<Page, CoreError>> + 'a {
        let initial = ChainState {
            cursor: None,
            pages_fetched: 0,
            finished: false,
        };

        stream::try_unfold(initial, move |state| async move {
            if state.finished {
                return Ok(None);
            }
            if cancel.is_cancelled() {
                return Err(CoreError::Cancelled {
                    resource: resource_id.to_string(),
                    pages_fetched: state.pages_fetched,
                });
            }
            if state.pages_fetched >= self.max_pages {
                return Err(CoreError::PaginationAborted {
                    resource: resource_id.to_string(),
                    pages_fetched: state.pages_fetched,
                    reason: format!("safety bound of {} pages reached", self.max_pages),
                });
            }

            let page = match self
                .client
                .fetch_page(resource_id, state.cursor.as_ref(), self.page_size)
                .await
                .into_page()
            {
                Ok(page) => page,
                Err(e) => {
                    return Err(CoreError::PaginationAborted {
                        resource: resource_id.to_string(),
                        pages_fetched: state.pages_fetched,
                        reason: e.to_string(),
                    })
                }
            };

            debug!(
                "r/{} page {} done, continuing: {}",
                resource_id,
                state.pages_fetched + 1,
                !page.is_last()
            );

            let next = ChainState {
                cursor: page.next_cursor.clone(),
                pages_fetched: state.pages_fetched + 1,
                finished: page.is_last(),
            };
            Ok(Some((page, next)))
        })
    }

    /// Every item of every page, in order. Any failure discards what was
    /// already collected.
    pub async fn collect_items(
        &self,
        resource_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Item>, CoreError> {
        let result = self
            .pages(resource_id, cancel)
            .try_fold(Vec::new(), |mut items, page| async move {
                items.extend(page.items);
                Ok::<_, CoreError>(items)
            })
            .await;

        match &result {
            Ok(items) => info!("Collected {} item(s) from r/{}", items.len(), resource_id),
            Err(e) => warn!("Discarding partial listing for r/{}: {}", resource_id, e),
        }
        result
    }
}
