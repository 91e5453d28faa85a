pub mod api;
pub mod metrics;
pub mod paginator;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;


pub use api::{ListingClient, PageResult};
pub use metrics::{ApiMetrics, MetricsCollector, RequestOutcome};
pub use paginator::Paginator;
pub use transport::{HttpTransport, RawResponse, Transport};
