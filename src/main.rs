use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ai_utility::cli::Cli;
use ai_utility::config::Config;
use ai_utility::embeddings::GoogleEmbeddings;
use ai_utility::llm::create_llm_provider;
use ai_utility::web::{self, AppState, WebServer, WebServerConfig};

/// How often idle browser sessions are swept.
const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ai_utility=info,tower_http=info")),
        )
        .init();

    let mut config = Config::from_env()?;
    cli.apply(&mut config);

    let llm = create_llm_provider(&config.google)?;
    let embeddings = Arc::new(GoogleEmbeddings::from_config(&config.google));
    tracing::info!(model = %config.google.embedding_model, "Using Google embeddings");

    let state = AppState::new(llm, embeddings);
    let pruner = Arc::clone(&state.sessions)
        .spawn_pruner(config.session.idle_timeout, SESSION_PRUNE_INTERVAL);
    let mut server = WebServer::new(
        WebServerConfig {
            addr: config.gateway.addr()?,
        },
        web::routes(state),
    );

    let addr = server.start().await?;
    println!("AI Utility running at http://{}", addr);

    tokio::signal::ctrl_c().await?;
    server.shutdown().await;
    pruner.abort();

    Ok(())
}
