// ABOUTME: Agreement Studio HTTP server binary
// ABOUTME: Loads configuration, prepares the database and provider, and serves all routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Agreement Studio Server Binary
//!
//! Starts the HTTP server for the agreement flow and the staff archive.

use std::sync::Arc;

use agreement_studio::{
    config::environment::ServerConfig,
    database::Database,
    llm::{GeminiProvider, LlmProvider, OfflineProvider},
    logging,
    resources::StudioResources,
    routes, shutdown,
};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "agreement-studio")]
#[command(about = "Agreement Studio - guided co-authoring of personal agreements")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Agreement Studio");
    info!("{}", config.summary());

    let database = Database::new(&config.database).await?;
    let seeded = database.agreement_types().seed_defaults().await?;
    info!(
        "Database ready at {} ({seeded} agreement types created)",
        config.database
    );

    let provider = build_provider(&config);
    info!("Assistant provider: {}", provider.display_name());

    let resources = Arc::new(StudioResources::new(database, provider, &config));
    let app = routes::router(resources);

    let address = format!("{}:{}", config.host, config.http_port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Listening on http://{address}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Agreement Studio stopped");
    Ok(())
}

fn build_provider(config: &ServerConfig) -> Arc<dyn LlmProvider> {
    match config.llm.api_key.as_deref() {
        Some(api_key) => Arc::new(
            GeminiProvider::new(api_key).with_default_model(config.llm.model.clone()),
        ),
        None => {
            warn!("GEMINI_API_KEY not set; every assistant step will use its fallback text");
            Arc::new(OfflineProvider)
        }
    }
}
