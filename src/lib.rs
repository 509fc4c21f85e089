// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod batch;
pub mod config;
pub mod export;
pub mod ingest;
pub mod keyword_index;
pub mod keywords;
pub mod metrics;
pub mod pipeline;
pub mod session;
pub mod sentiment;
pub mod wordcloud;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router as router, AppState};
pub use crate::batch::AnalysisBatch;
pub use crate::sentiment::{SentimentAnalyzer, SentimentLabel, SentimentResult};

use axum::Router;
use tracing::info;

use crate::config::DashboardConfig;
use crate::metrics::Metrics;

/// Build the full application router: dashboard API plus `/metrics` when the
/// Prometheus recorder could be installed.
pub async fn app() -> anyhow::Result<Router> {
    let config = DashboardConfig::load_default()?;
    info!(
        recent_comments = config.display.recent_comments,
        keyword_list = config.display.keyword_list,
        max_upload_bytes = config.ingest.max_upload_bytes,
        "dashboard config loaded"
    );

    let router = api::create_router(AppState::new(config));
    Ok(match Metrics::init() {
        Some(m) => router.merge(m.router()),
        None => router,
    })
}
