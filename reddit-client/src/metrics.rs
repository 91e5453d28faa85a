use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// How a single request was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestOutcome {
    Success,
    NotFound,
    TransportError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub not_found_requests: u64,
    pub transport_errors: u64,
    pub average_response_time: Duration,
    pub last_request_time: Option<SystemTime>,
    pub requests_by_endpoint: HashMap<String, EndpointMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointMetrics {
    pub request_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_response_time: Duration,
    pub min_response_time: Duration,
    pub max_response_time: Duration,
}

#[derive(Debug, Clone)]
pub struct RequestMetrics {
    pub endpoint: String,
    pub status_code: Option<u16>,
    pub response_time: Duration,
    pub outcome: RequestOutcome,
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            not_found_requests: 0,
            transport_errors: 0,
            average_response_time: Duration::from_millis(0),
            last_request_time: None,
            requests_by_endpoint: HashMap::new(),
        }
    }
}

impl EndpointMetrics {
    fn new() -> Self {
        Self {
            request_count: 0,
            success_count: 0,
            error_count: 0,
            total_response_time: Duration::from_millis(0),
            min_response_time: Duration::MAX,
            max_response_time: Duration::from_millis(0),
        }
    }

    fn update(&mut self, metrics: &RequestMetrics) {
        self.request_count += 1;
        self.total_response_time += metrics.response_time;

        if metrics.response_time < self.min_response_time {
            self.min_response_time = metrics.response_time;
        }
        if metrics.response_time > self.max_response_time {
            self.max_response_time = metrics.response_time;
        }

        if metrics.outcome == RequestOutcome::Success {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
    }
}

/// Per-client request bookkeeping. Read-only with respect to results.
#[derive(Debug)]
pub struct MetricsCollector {
    metrics: RwLock<ApiMetrics>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: RwLock::new(ApiMetrics::default()),
        }
    }

    pub async fn record_request(&self, request_metrics: RequestMetrics) {
        let mut metrics = self.metrics.write().await;

        metrics.total_requests += 1;
        metrics.last_request_time = Some(SystemTime::now());

        match request_metrics.outcome {
            RequestOutcome::Success => metrics.successful_requests += 1,
            RequestOutcome::NotFound => metrics.not_found_requests += 1,
            RequestOutcome::TransportError => metrics.transport_errors += 1,
        }

        // Running mean over all requests so far
        let total_time = metrics.average_response_time * (metrics.total_requests - 1) as u32
            + request_metrics.response_time;
        metrics.average_response_time = total_time / metrics.total_requests as u32;

        metrics
            .requests_by_endpoint
            .entry(request_metrics.endpoint.clone())
            .or_insert_with(EndpointMetrics::new)
            .update(&request_metrics);
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.read().await.clone()
    }

    pub async fn export_metrics(&self) -> Result<String, serde_json::Error> {
        let metrics = self.get_metrics().await;
        serde_json::to_string_pretty(&metrics)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hot_request(outcome: RequestOutcome, millis: u64) -> RequestMetrics {
        RequestMetrics {
            endpoint: "hot".to_string(),
            status_code: Some(200),
            response_time: Duration::from_millis(millis),
            outcome,
        }
    }

    #[tokio::test]
    async fn test_metrics_collection() {
        let collector = MetricsCollector::new();

        collector
            .record_request(hot_request(RequestOutcome::Success, 150))
            .await;
        collector
            .record_request(hot_request(RequestOutcome::TransportError, 50))
            .await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.successful_requests, 1);
        assert_eq!(metrics.transport_errors, 1);
        assert_eq!(metrics.not_found_requests, 0);
        assert_eq!(metrics.average_response_time, Duration::from_millis(100));
        assert!(metrics.last_request_time.is_some());
    }

    #[tokio::test]
    async fn test_endpoint_metrics() {
        let collector = MetricsCollector::new();

        collector
            .record_request(hot_request(RequestOutcome::Success, 100))
            .await;
        collector
            .record_request(hot_request(RequestOutcome::NotFound, 300))
            .await;

        let metrics = collector.get_metrics().await;
        let hot = &metrics.requests_by_endpoint["hot"];
        assert_eq!(hot.request_count, 2);
        assert_eq!(hot.success_count, 1);
        assert_eq!(hot.error_count, 1);
        assert_eq!(hot.total_response_time, Duration::from_millis(400));
        assert_eq!(hot.min_response_time, Duration::from_millis(100));
        assert_eq!(hot.max_response_time, Duration::from_millis(300));
        assert!(!metrics.requests_by_endpoint.contains_key("about"));
    }

    #[tokio::test]
    async fn test_export_metrics() {
        let collector = MetricsCollector::new();
        collector
            .record_request(hot_request(RequestOutcome::Success, 10))
            .await;

        let exported = collector.export_metrics().await.unwrap();
        assert!(exported.contains("transport_errors"));
        assert!(exported.contains("\"hot\""));
    }
}
