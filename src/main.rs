use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinerec_api::api::{create_router, AppState, RecommenderContext};
use cinerec_api::config::Config;
use cinerec_api::services::{dataset, GeminiRanker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let generative = Arc::new(GeminiRanker::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
    ));

    // A missing dataset must not kill the process: serve with an absent
    // context and let ranking requests fail 503 until it is fixed.
    let context = match dataset::load_corpus(&config).await {
        Ok(corpus) => Some(RecommenderContext::new(corpus)),
        Err(e) => {
            tracing::error!(error = %e, "Dataset unavailable, recommender left uninitialized");
            None
        }
    };

    let state = AppState::new(context, generative);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
