use keyword_engine::{render, KeywordAggregator};
use reddit_client::testing::ScriptedTransport;
use reddit_client::{ListingClient, Paginator, RawResponse};
use tokio_util::sync::CancellationToken;

const BASE: &str = "https://www.reddit.com/r";
const HOT: &str = "https://www.reddit.com/r/programming/hot.json";

fn aggregator(transport: ScriptedTransport) -> KeywordAggregator<ScriptedTransport> {
    KeywordAggregator::new(Paginator::with_bounds(
        ListingClient::new(transport, BASE),
        100,
        50,
    ))
}

async fn report_lines(transport: ScriptedTransport, keywords: &[&str]) -> Vec<String> {
    let lines = aggregator(transport)
        .report("programming", keywords, &CancellationToken::new())
        .await;
    render(&lines)
}

const TITLES: [&str; 6] = [
    "Java or JavaScript?",
    "Why I moved from java to Rust",
    "python python PYTHON",
    "Rust 1.80 released",
    "javascript fatigue",
    "Nothing to see here",
];

#[tokio::test]
async fn test_report_across_pages() {
    let transport = ScriptedTransport::new()
        .page(HOT, None, &TITLES[..2], Some("p2"))
        .page(HOT, Some("p2"), &TITLES[2..4], Some("p3"))
        .page(HOT, Some("p3"), &TITLES[4..], None);

    let lines = report_lines(
        transport,
        &["python", "java", "javascript", "rust", "Go", "JAVA"],
    )
    .await;

    assert_eq!(
        lines,
        vec!["python: 3", "java: 2", "javascript: 2", "rust: 2"]
    );
}

#[tokio::test]
async fn test_counts_do_not_depend_on_page_boundaries() {
    let keywords = ["python", "java", "rust"];

    let single = ScriptedTransport::new().page(HOT, None, &TITLES, None);
    let split = ScriptedTransport::new()
        .page(HOT, None, &TITLES[..1], Some("a"))
        .page(HOT, Some("a"), &TITLES[1..5], Some("b"))
        .page(HOT, Some("b"), &[], Some("c"))
        .page(HOT, Some("c"), &TITLES[5..], None);

    let single_counts = aggregator(single)
        .count_keywords("programming", &keywords, &CancellationToken::new())
        .await
        .unwrap();
    let split_counts = aggregator(split)
        .count_keywords("programming", &keywords, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(single_counts, split_counts);
    assert_eq!(single_counts.len(), 3);
}

#[tokio::test]
async fn test_single_line_for_repeated_matches() {
    let transport = ScriptedTransport::new().page(HOT, None, &["cat cat cat"], None);

    assert_eq!(report_lines(transport, &["dog", "cat"]).await, vec!["cat: 3"]);
}

#[tokio::test]
async fn test_case_variants_collapse() {
    let transport = ScriptedTransport::new().page(HOT, None, &["Cat sat on a cat"], None);

    assert_eq!(report_lines(transport, &["Cat", "cat"]).await, vec!["cat: 2"]);
}

#[tokio::test]
async fn test_missing_subreddit_prints_nothing() {
    let redirect = ScriptedTransport::new().route(
        HOT,
        None,
        Ok(RawResponse::redirect("https://www.reddit.com/subreddits/search.json")),
    );
    let error_status = ScriptedTransport::new().route(HOT, None, Ok(RawResponse::status(500)));
    let empty = ScriptedTransport::new().page(HOT, None, &[], None);

    for transport in [redirect, error_status, empty] {
        assert!(report_lines(transport, &["rust"]).await.is_empty());
    }
}

#[tokio::test]
async fn test_failure_after_first_page_prints_nothing() {
    let transport = ScriptedTransport::new().page(HOT, None, &["rust rust"], Some("broken"));

    let aggregator = aggregator(transport);
    let counts = aggregator
        .count_keywords("programming", &["rust"], &CancellationToken::new())
        .await;
    assert!(counts.is_none());
}

#[tokio::test]
async fn test_non_string_title_is_skipped() {
    let transport = ScriptedTransport::new().route(
        HOT,
        None,
        Ok(RawResponse::ok(
            r#"{"data":{"after":null,"children":[{"data":{"title":"rust rust"}},{"data":{"title":42}}]}}"#,
        )),
    );

    assert_eq!(report_lines(transport, &["rust"]).await, vec!["rust: 2"]);
}

#[tokio::test]
async fn test_child_without_data_is_skipped() {
    let transport = ScriptedTransport::new().route(
        HOT,
        None,
        Ok(RawResponse::ok(
            r#"{"data":{"after":null,"children":[{"kind":"t3","data":null},{"kind":"t3","data":{"title":"rust"}}]}}"#,
        )),
    );

    assert_eq!(report_lines(transport, &["rust"]).await, vec!["rust: 1"]);
}

#[tokio::test]
async fn test_no_matches_prints_nothing() {
    let transport = ScriptedTransport::new().page(HOT, None, &TITLES, None);

    assert!(report_lines(transport, &["haskell"]).await.is_empty());
}

#[tokio::test]
async fn test_repeat_runs_are_identical() {
    let transport = ScriptedTransport::new()
        .page(HOT, None, &TITLES[..3], Some("p2"))
        .page(HOT, Some("p2"), &TITLES[3..], None);
    let aggregator = aggregator(transport.clone());
    let keywords = ["rust", "java", "python", "javascript"];

    let first = render(
        &aggregator
            .report("programming", &keywords, &CancellationToken::new())
            .await,
    )
    .join("\n");
    let second = render(
        &aggregator
            .report("programming", &keywords, &CancellationToken::new())
            .await,
    )
    .join("\n");

    assert_eq!(first, second);
    assert!(!first.is_empty());
    assert_eq!(transport.request_count(), 4);
}
