//! Output modes. Each returns the lines to print, already degraded on failure.

use hotwords_core::{CoreError, ErrorReporter, Item};
use keyword_engine::{render, KeywordAggregator};
use reddit_client::{ListingClient, Paginator, Transport};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Printed by the listing modes when the subreddit cannot be read.
pub const FAILURE_MARKER: &str = "None";

fn titles(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .filter_map(Item::title)
        .map(str::to_string)
        .collect()
}

/// Every title the listing carried, blanks included. Only missing titles are dropped.
fn raw_titles(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.title.clone())
        .collect()
}

fn degrade(error: CoreError) -> Vec<String> {
    ErrorReporter::new().report_warning(&error);
    vec![FAILURE_MARKER.to_string()]
}

pub async fn subscribers<T: Transport>(client: &ListingClient<T>, subreddit: &str) -> Vec<String> {
    vec![client.number_of_subscribers(subreddit).await.to_string()]
}

/// Titles of the first page only.
pub async fn top_titles<T: Transport>(
    paginator: &Paginator<T>,
    subreddit: &str,
    limit: u32,
) -> Vec<String> {
    match paginator
        .client()
        .fetch_page(subreddit, None, limit)
        .await
        .into_page()
    {
        Ok(page) => titles(&page.items),
        Err(e) => degrade(CoreError::Listing(e)),
    }
}

/// Titles across the whole cursor chain, unfiltered.
pub async fn all_titles<T: Transport>(
    paginator: &Paginator<T>,
    subreddit: &str,
    cancel: &CancellationToken,
) -> Vec<String> {
    match paginator.collect_items(subreddit, cancel).await {
        Ok(items) => raw_titles(&items),
        Err(e) => degrade(e),
    }
}

pub async fn keyword_report<T: Transport>(
    aggregator: &KeywordAggregator<T>,
    subreddit: &str,
    keywords: &[String],
    cancel: &CancellationToken,
) -> Vec<String> {
    let keywords = split_keywords(keywords);
    if keywords.is_empty() {
        warn!("No keywords given for r/{}", subreddit);
        return Vec::new();
    }
    render(&aggregator.report(subreddit, keywords.as_slice(), cancel).await)
}

/// Accepts both `a b c` and `"a b c"` on the command line.
pub fn split_keywords(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split_whitespace())
        .map(str::to_string)
        .collect()
}
