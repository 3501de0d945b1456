mod config;
mod errors;
mod generation;
mod llm_client;
mod render;
mod routes;
mod state;
mod synth;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{LanguageModel, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::synth::{Synthesizer, TableSet};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Muse API v{}", env!("CARGO_PKG_VERSION"));

    // Synthesizer tables: file override or the built-in phrase banks
    let synth = match &config.synth_tables_path {
        Some(path) => Synthesizer::new(TableSet::load(path)?)?,
        None => Synthesizer::builtin()?,
    };
    let synth = Arc::new(synth);

    // Optional LLM client; requests may still bring their own key
    let llm: Option<Arc<dyn LanguageModel>> = match &config.llm_api_key {
        Some(key) => {
            let client = LlmClient::new(
                key,
                &config.llm_base_url,
                &config.llm_model,
                Duration::from_secs(config.llm_timeout_secs),
            )?;
            info!("LLM client initialized (model: {})", config.llm_model);
            Some(Arc::new(client))
        }
        None => {
            warn!("LLM_API_KEY not set; generation uses fallback templates unless a request supplies a key");
            None
        }
    };

    if let Some(seed) = config.synth_seed {
        info!("Fallback generation seeded with {seed}");
    }

    let state = AppState {
        config: config.clone(),
        synth,
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
