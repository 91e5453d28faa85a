//! Whole-word keyword frequency over a subreddit's hot listing.
//!
//! [`KeywordAggregator`] pulls every title through a
//! [`reddit_client::Paginator`], counts each normalized keyword with
//! [`CountMap`], and [`format_report`] turns the counts into sorted
//! `keyword: count` lines.

pub mod aggregator;
pub mod keywords;
pub mod report;

pub use aggregator::{tally, CountMap, KeywordAggregator};
pub use keywords::{Keyword, KeywordSet};
pub use report::{format_report, render, ReportLine};
