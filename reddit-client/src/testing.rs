//! Deterministic in-memory [`Transport`] for tests.
//!
//! Responses are routed by request URL and the value of the `after` query
//! parameter, so the same script can be replayed any number of times.
//! Unrouted requests answer with a bare 404.

use crate::transport::{RawResponse, Transport};
use async_trait::async_trait;
use hotwords_core::ListingError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

type Route = (String, Option<String>);

#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    routes: Arc<Mutex<HashMap<Route, Result<RawResponse, ListingError>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        self,
        url: &str,
        after: Option<&str>,
        response: Result<RawResponse, ListingError>,
    ) -> Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert((url.to_string(), after.map(str::to_string)), response);
        }
        self
    }

    /// Routes a well-formed hot listing page with the given titles.
    pub fn page(self, url: &str, after: Option<&str>, titles: &[&str], next: Option<&str>) -> Self {
        let body = listing_body(titles, next);
        self.route(url, after, Ok(RawResponse::ok(body)))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, ListingError> {
        let recorded = RecordedRequest {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        };
        let key = (url.to_string(), recorded.param("after").map(str::to_string));

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(recorded);
        }

        self.routes
            .lock()
            .ok()
            .and_then(|routes| routes.get(&key).cloned())
            .unwrap_or_else(|| Ok(RawResponse::status(404)))
    }
}

/// Renders a hot listing document in the upstream shape.
pub fn listing_body(titles: &[&str], next: Option<&str>) -> String {
    let children: Vec<serde_json::Value> = titles
        .iter()
        .map(|title| serde_json::json!({ "kind": "t3", "data": { "title": title } }))
        .collect();

    serde_json::json!({
        "kind": "Listing",
        "data": { "children": children, "after": next }
    })
    .to_string()
}
