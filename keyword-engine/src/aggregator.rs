use crate::keywords::KeywordSet;
use crate::report::{format_report, ReportLine};
use hotwords_core::{ErrorReporter, Item};
use reddit_client::{HttpTransport, Paginator, Transport};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Occurrences per normalized keyword. Every keyword of the set is present,
/// including those that never matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMap {
    counts: BTreeMap<String, u64>,
}

impl CountMap {
    pub fn register(keywords: &KeywordSet) -> Self {
        Self {
            counts: keywords
                .iter()
                .map(|keyword| (keyword.as_str().to_string(), 0))
                .collect(),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<u64> {
        self.counts.get(keyword).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(keyword, count)| (keyword.as_str(), *count))
    }

    /// Adds the matches found in `items` to the running counts.
    pub fn accumulate<'a, I>(&mut self, keywords: &KeywordSet, items: I)
    where
        I: IntoIterator<Item = &'a Item>,
    {
        for title in items.into_iter().filter_map(Item::title) {
            let lowered = title.to_lowercase();
            for keyword in keywords.iter() {
                let found = keyword.occurrences(&lowered);
                if found > 0 {
                    *self.counts.entry(keyword.as_str().to_string()).or_insert(0) += found;
                }
            }
        }
    }
}

impl FromIterator<(String, u64)> for CountMap {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Counts every keyword across an item sequence.
pub fn tally<'a, I>(keywords: &KeywordSet, items: I) -> CountMap
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut counts = CountMap::register(keywords);
    counts.accumulate(keywords, items);
    counts
}

/// Drives a [`Paginator`] and counts keyword occurrences over all titles.
#[derive(Debug)]
pub struct KeywordAggregator<T = HttpTransport> {
    paginator: Paginator<T>,
}

impl<T: Transport> KeywordAggregator<T> {
    pub fn new(paginator: Paginator<T>) -> Self {
        Self { paginator }
    }

    pub fn paginator(&self) -> &Paginator<T> {
        &self.paginator
    }

    /// `None` when there is nothing to count: the chain failed, was
    /// cancelled, or the listing is empty. These cases are not distinguished.
    pub async fn count_keywords<S: AsRef<str>>(
        &self,
        resource_id: &str,
        keywords: &[S],
        cancel: &CancellationToken,
    ) -> Option<CountMap> {
        let keywords = match KeywordSet::new(keywords) {
            Ok(keywords) => keywords,
            Err(e) => {
                ErrorReporter::new().report_warning(&e);
                return None;
            }
        };
        let mut counts = CountMap::register(&keywords);
        debug!("Registered {} keyword(s) for r/{}", counts.len(), resource_id);

        let items = match self.paginator.collect_items(resource_id, cancel).await {
            Ok(items) => items,
            Err(e) => {
                ErrorReporter::new().report_warning(&e);
                return None;
            }
        };
        if items.is_empty() {
            info!("r/{} has no posts to count", resource_id);
            return None;
        }

        counts.accumulate(&keywords, &items);
        Some(counts)
    }

    /// Sorted non-zero report lines, or nothing at all.
    pub async fn report<S: AsRef<str>>(
        &self,
        resource_id: &str,
        keywords: &[S],
        cancel: &CancellationToken,
    ) -> Vec<ReportLine> {
        match self.count_keywords(resource_id, keywords, cancel).await {
            Some(counts) => format_report(&counts),
            None => {
                warn!("No keyword report for r/{}", resource_id);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(titles: &[&str]) -> Vec<Item> {
        titles.iter().map(|t| Item::new(*t)).collect()
    }

    #[test]
    fn test_register_before_counting() {
        let keywords = KeywordSet::new(["a", "b", "c"]).unwrap();
        let counts = CountMap::register(&keywords);

        assert_eq!(counts.len(), 3);
        assert!(counts.iter().all(|(_, count)| count == 0));
    }

    #[test]
    fn test_case_insensitive_counts() {
        let keywords = KeywordSet::new(["Cat", "cat", "dog"]).unwrap();
        let counts = tally(&keywords, &items(&["Cat sat", "CAT and cat", "category"]));

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("cat"), Some(3));
        assert_eq!(counts.get("dog"), Some(0));
    }

    #[test]
    fn test_untitled_items_are_skipped() {
        let keywords = KeywordSet::new(["rust"]).unwrap();
        let sequence = vec![Item::untitled(), Item::new(""), Item::new("Rust rust")];

        assert_eq!(tally(&keywords, &sequence).get("rust"), Some(2));
    }

    #[test]
    fn test_accumulate_in_chunks_matches_whole() {
        let keywords = KeywordSet::new(["go", "rust"]).unwrap();
        let sequence = items(&["go rust", "rust", "go go", "nothing", "Rust!"]);

        let whole = tally(&keywords, &sequence);

        let mut chunked = CountMap::register(&keywords);
        for chunk in sequence.chunks(2) {
            chunked.accumulate(&keywords, chunk);
        }

        assert_eq!(whole, chunked);
        assert_eq!(whole.get("rust"), Some(3));
        assert_eq!(whole.get("go"), Some(3));
    }
}
