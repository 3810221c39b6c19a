//! Document query server binary

use anyhow::Result;
use docquery::{AppConfig, QueryServer};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("docquery=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            AppConfig::load(&path)?
        }
        None => {
            tracing::info!("No config file given, using defaults");
            AppConfig::default()
        }
    };

    probe_ollama(&config).await;

    let server = QueryServer::new(config)?;
    tracing::info!("Listening on {}", server.address());
    server.start().await?;

    Ok(())
}

/// Warn early if the model server is unreachable; requests will still be
/// accepted and fail individually with a gateway error.
async fn probe_ollama(config: &AppConfig) {
    let url = format!("{}/api/tags", config.llm.base_url.trim_end_matches('/'));
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Could not build probe client: {}", e);
            return;
        }
    };

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama reachable at {}", config.llm.base_url);
        }
        Ok(resp) => {
            tracing::warn!("Ollama at {} returned {}", config.llm.base_url, resp.status());
        }
        Err(e) => {
            tracing::warn!(
                "Ollama not reachable at {} ({}); queries will fail until it is up",
                config.llm.base_url,
                e
            );
        }
    }
}
