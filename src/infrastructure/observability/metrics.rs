//! Prometheus metrics definitions for the pricing engine
//!
//! All metrics use the `pricing_` prefix.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for scoring calls
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Model invocations by model family and outcome
    pub predictions_total: CounterVec,
    /// End-to-end latency of one scoring call
    pub scoring_latency_seconds: HistogramVec,
    /// Estimated revenue of the most recent scoring call
    pub estimated_revenue: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new(
                "pricing_predictions_total",
                "Model invocations by model family and status",
            ),
            &["model", "status"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let scoring_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "pricing_scoring_latency_seconds",
                "Scoring call latency in seconds",
            )
            .buckets(vec![
                0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
            ]),
            &["operation"],
        )?;
        registry.register(Box::new(scoring_latency_seconds.clone()))?;

        let estimated_revenue = Gauge::with_opts(Opts::new(
            "pricing_estimated_revenue",
            "Estimated revenue of the last scored request",
        ))?;
        registry.register(Box::new(estimated_revenue.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            scoring_latency_seconds,
            estimated_revenue,
        })
    }

    pub fn record_prediction(&self, model: &str, success: bool) {
        let status = if success { "ok" } else { "error" };
        self.predictions_total
            .with_label_values(&[model, status])
            .inc();
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        Ok(encoder.encode_to_string(&families)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_record_prediction_counts_by_status() {
        let metrics = Metrics::new().unwrap();
        metrics.record_prediction("lightgbm", true);
        metrics.record_prediction("lightgbm", true);
        metrics.record_prediction("xgboost", false);

        let ok = metrics
            .predictions_total
            .with_label_values(&["lightgbm", "ok"])
            .get();
        let failed = metrics
            .predictions_total
            .with_label_values(&["xgboost", "error"])
            .get();
        assert_eq!(ok, 2.0);
        assert_eq!(failed, 1.0);
    }

    #[test]
    fn test_encode_contains_metric_names() {
        let metrics = Metrics::new().unwrap();
        metrics.record_prediction("lightgbm", true);
        metrics.estimated_revenue.set(1250.0);

        let output = metrics.encode().unwrap();
        assert!(output.contains("pricing_predictions_total"));
        assert!(output.contains("pricing_estimated_revenue 1250"));
    }
}
