//! Prometheus metrics collection for qagen
//!
//! Tracks:
//! - Requests by selected strategy (qa, freeform, invalid)
//! - Model invocations by outcome
//! - Model call latency
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use crate::dispatch::Dispatch;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Result of a model invocation, used as a metrics label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Convert outcome to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

/// Metrics collector for qagen
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounterVec,
    model_invocations: IntCounterVec,
    model_latency: Histogram,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 3 strategies
        let requests_total = IntCounterVec::new(
            Opts::new(
                "qagen_requests_total",
                "Total number of generation requests by selected strategy",
            ),
            &["strategy"],
        )?;

        let model_invocations = IntCounterVec::new(
            Opts::new(
                "qagen_model_invocations_total",
                "Total model invocations by outcome",
            ),
            &["outcome"],
        )?;

        let model_latency = Histogram::with_opts(
            HistogramOpts::new(
                "qagen_model_latency_ms",
                "Model call latency in milliseconds",
            )
            .buckets(vec![
                50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0, 60000.0,
            ]),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(model_invocations.clone()))?;
        registry.register(Box::new(model_latency.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            model_invocations,
            model_latency,
        })
    }

    /// Record a classified request
    ///
    /// # Errors
    ///
    /// Returns an error if the metric is not registered.
    pub fn record_request(&self, dispatch: Dispatch<'_>) -> Result<(), prometheus::Error> {
        self.requests_total
            .get_metric_with_label_values(&[dispatch.as_str()])?
            .inc();
        Ok(())
    }

    /// Record a model invocation and how long it took
    ///
    /// # Errors
    ///
    /// Returns an error if `latency_ms` is NaN, infinite, or negative, since
    /// such values corrupt histogram percentiles. The invocation counter is
    /// still incremented in that case.
    pub fn record_model_invocation(
        &self,
        outcome: Outcome,
        latency_ms: f64,
    ) -> Result<(), prometheus::Error> {
        self.model_invocations
            .get_metric_with_label_values(&[outcome.as_str()])?
            .inc();

        if !latency_ms.is_finite() || latency_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite and non-negative, got: {}",
                latency_ms
            )));
        }

        self.model_latency.observe(latency_ms);
        Ok(())
    }

    /// Encode all registered metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    metric_family_count = metric_families.len(),
                    "Prometheus text encoder failed"
                );
                e
            })?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("Metrics output is not valid UTF-8: {}", e))
        })
    }
}
