//! HTTP front end for a [`SentimentAnalyzer`].
//!
//! One classifier is loaded at startup and shared by every request; inference
//! runs on tokio's blocking pool.

pub mod routes;

use crate::sentiment::{Classifier, LabelMapping, ModelVariant, SentimentAnalyzer};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub type SharedClassifier = Arc<dyn Classifier>;

/// Application state shared across handlers
pub struct AppState {
    pub analyzer: SentimentAnalyzer<SharedClassifier>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(classifier: SharedClassifier, variant: ModelVariant) -> Self {
        Self {
            analyzer: SentimentAnalyzer::new(classifier, variant),
            start_time: Instant::now(),
        }
    }

    pub fn with_labels(mut self, labels: LabelMapping) -> Self {
        self.analyzer = self.analyzer.with_labels(labels);
        self
    }
}

/// All routes with tracing and permissive CORS, ready to serve.
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .merge(routes::page_routes())
        .merge(routes::health_routes())
        .merge(routes::analysis_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the HTTP server until the process is stopped.
pub async fn run(addr: &str, state: AppState) -> Result<()> {
    let classifier = state.analyzer.classifier().name();
    let variant = state.analyzer.variant();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%variant, %classifier, "Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
