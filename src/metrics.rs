use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::warn;

use crate::aggregate::SentimentCounts;

static HANDLE: OnceCell<Option<PrometheusHandle>> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process.
    ///
    /// Returns `None` if another recorder was installed first (e.g. by an
    /// embedding application); metrics macros then report there instead.
    pub fn init() -> Option<Self> {
        HANDLE
            .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
                Ok(handle) => {
                    describe();
                    Some(handle)
                }
                Err(e) => {
                    warn!(error = %e, "prometheus recorder not installed");
                    None
                }
            })
            .clone()
            .map(|handle| Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!("analysis_runs_total", "Completed analysis runs.");
    describe_counter!("analysis_comments_total", "Comments scored across all runs.");
    describe_histogram!("analysis_duration_ms", "Ingestion + scoring time per run.");
    describe_gauge!("batch_comments", "Comments in the most recent batch.");
    describe_gauge!(
        "batch_sentiment",
        "Comments per sentiment label in the most recent batch."
    );
    describe_counter!(
        "sentiment_oracle_failures_total",
        "Comments scored neutral because the polarity oracle failed."
    );
}

/// Telemetry for one finished run.
pub fn record_analysis(comments: usize, counts: SentimentCounts, duration_ms: f64) {
    counter!("analysis_runs_total").increment(1);
    counter!("analysis_comments_total").increment(comments as u64);
    histogram!("analysis_duration_ms").record(duration_ms);
    gauge!("batch_comments").set(comments as f64);
    gauge!("batch_sentiment", "label" => "positive").set(counts.positive as f64);
    gauge!("batch_sentiment", "label" => "neutral").set(counts.neutral as f64);
    gauge!("batch_sentiment", "label" => "negative").set(counts.negative as f64);
}
