//! Lightweight in-process metrics.
//!
//! Metrics are stored as atomics and rendered in Prometheus text format on
//! demand; exporting them is left to the embedding application.

pub mod metrics;

pub use metrics::ReplyMetrics;
