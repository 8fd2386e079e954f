use super::AppState;
use crate::sentiment::{report, SentimentResult};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Gradio-style `{"data": [text]}`. Only the first entry is read; a missing
/// or non-string entry is treated as empty text.
#[derive(Debug, Deserialize)]
pub struct EnvelopeRequest {
    pub data: Vec<Value>,
}

impl EnvelopeRequest {
    fn text(&self) -> String {
        self.data
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeRequest {
    Envelope(EnvelopeRequest),
    Text(TextRequest),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub variant: String,
    pub classifier: String,
    pub uptime_secs: u64,
}

// ============================================================================
// Page
// ============================================================================

pub fn page_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ============================================================================
// Health
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        variant: state.analyzer.variant().to_string(),
        classifier: state.analyzer.classifier().name(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Analysis
// ============================================================================

pub fn analysis_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/report", post(report_markdown))
        .route("/api/predict", post(predict))
}

/// `{"text"}` gets a bare record back, `{"data": [text]}` gets `{"data": [record]}`.
async fn analyze(
    State(state): State<AppStateArc>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Response, (StatusCode, String)> {
    match req {
        AnalyzeRequest::Text(req) => {
            let result = run_analysis(state, req.text).await?;
            Ok(Json(report::to_record(&result)).into_response())
        }
        AnalyzeRequest::Envelope(req) => {
            let result = run_analysis(state, req.text()).await?;
            Ok(Json(Envelope {
                data: vec![report::to_record(&result)],
            })
            .into_response())
        }
    }
}

async fn report_markdown(
    State(state): State<AppStateArc>,
    Json(req): Json<TextRequest>,
) -> Result<Response, (StatusCode, String)> {
    let variant = state.analyzer.variant();
    let result = run_analysis(state, req.text).await?;
    let markdown = report::render(&result, variant);

    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    )
        .into_response())
}

async fn predict(
    State(state): State<AppStateArc>,
    Json(req): Json<EnvelopeRequest>,
) -> Result<Json<Envelope<String>>, (StatusCode, String)> {
    let variant = state.analyzer.variant();
    let result = run_analysis(state, req.text()).await?;
    Ok(Json(Envelope {
        data: vec![report::render(&result, variant)],
    }))
}

async fn run_analysis(
    state: AppStateArc,
    text: String,
) -> Result<SentimentResult, (StatusCode, String)> {
    debug!(chars = text.chars().count(), "Analyzing text");
    tokio::task::spawn_blocking(move || state.analyzer.analyze(&text))
        .await
        .map_err(|e| {
            error!("Analysis task failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Analysis task failed: {e}"),
            )
        })
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>AI Chat Sentiment Analysis Service</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
  textarea { width: 100%; min-height: 6rem; font-size: 1rem; }
  button { margin: 0.25rem 0.25rem 0 0; }
  #result { white-space: pre-wrap; background: #f6f6f6; padding: 1rem; border-radius: 6px; min-height: 3rem; }
</style>
</head>
<body>
<h1>🤖 AI Chat Sentiment Analysis Service</h1>
<p>Enter a message to classify it as positive, neutral or negative.</p>
<textarea id="text" placeholder="Type a message..."></textarea>
<div>
  <button id="analyze">Analyze</button>
</div>
<h3>Examples</h3>
<div id="examples"></div>
<h3>Result</h3>
<div id="result"></div>
<script>
const examples = [
  "This is amazing! I love it!",
  "I'm so sad and disappointed.",
  "The weather is okay today.",
  "This product is terrible, worst purchase ever!",
  "Great service, highly recommend!",
  "Bu harika!",
  "Çok kötü bir deneyim."
];
const text = document.getElementById("text");
const result = document.getElementById("result");

async function analyze() {
  const res = await fetch("/api/report", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ text: text.value })
  });
  result.textContent = await res.text();
}

for (const example of examples) {
  const button = document.createElement("button");
  button.textContent = example;
  button.onclick = () => { text.value = example; analyze(); };
  document.getElementById("examples").appendChild(button);
}
document.getElementById("analyze").onclick = analyze;
</script>
</body>
</html>
"#;
