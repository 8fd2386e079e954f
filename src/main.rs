use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentiment_service::client::SentimentClient;
use sentiment_service::core::{ModelConfig, ServiceConfig};
use sentiment_service::pipelines::sentiment_analysis_pipeline::*;
use sentiment_service::sentiment::{report, KeywordClassifier, ModelVariant, SentimentAnalyzer};
use sentiment_service::server::{self, AppState, SharedClassifier};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "sentiment-service")]
#[command(version, about = "Positive / neutral / negative sentiment for chat messages")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// binary (English SST-2) or multilingual (three-class)
    #[arg(long, global = true)]
    variant: Option<ModelVariant>,

    /// Run the model on CPU even when CUDA is available
    #[arg(long, global = true)]
    cpu: bool,

    /// Skip model loading and use the keyword classifier
    #[arg(long, global = true)]
    keyword_only: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API and web page (default)
    Serve,

    /// Analyze one text and print the report
    Analyze {
        text: String,
        /// Print the JSON record instead of the markdown report
        #[arg(long)]
        json: bool,
    },

    /// Ask a running sentiment service, falling back to keywords
    Query {
        /// Endpoint accepting `{"data": [text]}`, e.g. http://127.0.0.1:7860/api/analyze
        url: String,
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!("Sentiment service v{} starting...", env!("CARGO_PKG_VERSION"));
            let classifier = load_classifier(&config, cli.keyword_only).await?;
            let state = AppState::new(classifier, config.model.variant)
                .with_labels(config.label_mapping());
            server::run(&config.server.addr(), state).await?;
        }
        Commands::Analyze { text, json } => {
            let classifier = load_classifier(&config, cli.keyword_only).await?;
            let analyzer = SentimentAnalyzer::new(classifier, config.model.variant)
                .with_labels(config.label_mapping());

            let result = analyzer.analyze(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&report::to_record(&result))?);
            } else {
                println!("{}", report::render(&result, analyzer.variant()));
            }
        }
        Commands::Query { url, text } => {
            let client = SentimentClient::new(Some(url))?;
            let (sentiment, score) = client.analyze(&text).await;
            println!("{sentiment} {score}");
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(variant) = cli.variant {
        config.model.variant = variant;
    }
    if cli.cpu {
        config.model.device = "cpu".to_string();
    }
    Ok(config)
}

async fn load_classifier(config: &ServiceConfig, keyword_only: bool) -> Result<SharedClassifier> {
    if keyword_only {
        info!("Using keyword classifier");
        return keyword_classifier();
    }

    match load_model(&config.model).await {
        Ok(classifier) => Ok(classifier),
        Err(e) if config.fallback.keyword_classifier => {
            warn!("Failed to load sentiment model, falling back to keyword classifier: {e}");
            keyword_classifier()
        }
        Err(e) => Err(e).context("Failed to load sentiment model"),
    }
}

async fn load_model(model: &ModelConfig) -> sentiment_service::core::Result<SharedClassifier> {
    let device = model.device_request()?;

    let classifier: SharedClassifier = match model.variant {
        ModelVariant::Binary => {
            let mut builder = SentimentAnalysisPipelineBuilder::distilbert().device_request(device);
            if let Some(repo) = &model.model_id {
                builder = builder.model_id(repo.clone());
            }
            if let Some(repo) = &model.tokenizer_id {
                builder = builder.tokenizer_id(repo.clone());
            }
            Arc::new(builder.build().await?)
        }
        ModelVariant::Multilingual => {
            let mut builder =
                SentimentAnalysisPipelineBuilder::modernbert(model.size).device_request(device);
            if let Some(repo) = &model.model_id {
                builder = builder.model_id(repo.clone());
            }
            if let Some(repo) = &model.tokenizer_id {
                builder = builder.tokenizer_id(repo.clone());
            }
            Arc::new(builder.build().await?)
        }
    };
    Ok(classifier)
}

fn keyword_classifier() -> Result<SharedClassifier> {
    let classifier: SharedClassifier = Arc::new(KeywordClassifier::new()?);
    Ok(classifier)
}
