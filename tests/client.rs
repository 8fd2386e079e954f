// Remote client against a live server on an ephemeral port.

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use sentiment_service::client::SentimentClient;
use sentiment_service::sentiment::{classifier, ModelVariant, Sentiment};
use sentiment_service::server::{router, AppState, SharedClassifier};
use std::sync::Arc;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn state(variant: ModelVariant) -> AppState {
    let classifier: SharedClassifier = Arc::new(classifier::from_fn(|text: &str| {
        if text.contains("terrible") {
            Ok(vec![("negative".to_string(), 0.95), ("positive".to_string(), 0.05)])
        } else {
            Ok(vec![("negative".to_string(), 0.02), ("positive".to_string(), 0.98)])
        }
    }));
    AppState::new(classifier, variant)
}

#[tokio::test]
async fn reads_json_records() {
    let base = spawn(router(state(ModelVariant::Binary))).await;
    let client = SentimentClient::new(Some(format!("{base}/api/analyze"))).unwrap();

    assert_eq!(client.analyze("I love it!").await, (Sentiment::Positive, 0.98));
    assert_eq!(
        client.analyze("This is terrible").await,
        (Sentiment::Negative, 0.05)
    );
}

#[tokio::test]
async fn reads_both_markdown_layouts() {
    let binary = spawn(router(state(ModelVariant::Binary))).await;
    let client = SentimentClient::new(Some(format!("{binary}/api/predict"))).unwrap();
    assert_eq!(client.analyze("I love it!").await, (Sentiment::Positive, 0.98));

    let multilingual = spawn(router(state(ModelVariant::Multilingual))).await;
    let client = SentimentClient::new(Some(format!("{multilingual}/api/predict"))).unwrap();
    assert_eq!(client.analyze("I love it!").await, (Sentiment::Positive, 0.98));
    assert_eq!(
        client.analyze("This is terrible").await,
        (Sentiment::Negative, 0.95)
    );
}

#[tokio::test]
async fn error_status_falls_back_to_keywords() {
    let app = Router::new().route(
        "/api/analyze",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "loading") }),
    );
    let base = spawn(app).await;
    let client = SentimentClient::new(Some(format!("{base}/api/analyze"))).unwrap();

    assert_eq!(client.analyze("This is great!").await, (Sentiment::Positive, 0.7));
    assert_eq!(client.analyze("").await, (Sentiment::Neutral, 0.5));
}

#[tokio::test]
async fn unparseable_body_falls_back_to_keywords() {
    let app = Router::new().route("/api/analyze", post(|| async { "{\"result\": 1}" }));
    let base = spawn(app).await;
    let client = SentimentClient::new(Some(format!("{base}/api/analyze"))).unwrap();

    assert_eq!(
        client.analyze("bad and awful service").await,
        (Sentiment::Negative, 0.24)
    );
}
