//! Pull-free observability for the pricing engine
//!
//! Metrics are kept in a Prometheus registry and rendered on demand
//! (the CLI prints them with `--metrics`). No HTTP endpoint is exposed.

pub mod metrics;

pub use metrics::Metrics;
