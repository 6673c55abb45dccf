//! API layer
//!
//! HTTP handlers for:
//! - Account endpoints (signup / login / logout)
//! - The protected dashboard
//! - Metrics (Prometheus)

mod accounts;
mod dashboard;
pub mod metrics;

pub use accounts::accounts_router;
pub use dashboard::dashboard_router;
pub use metrics::metrics_router;
