// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Guild Dashboard API Server
//!
//! Backend for the bot dashboard: Discord login with mutual guild
//! detection, plus member stats served from Firestore.

use guild_dashboard_api::{
    config::Config,
    db::FirestoreDb,
    services::{DiscordService, StatsService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Guild Dashboard API");

    if let Err(e) = config.oauth.validate() {
        // Stats keep working; login routes will answer 500 until this is fixed
        tracing::warn!(error = %e, "OAuth configuration incomplete");
    }

    // One Firestore connection for the life of the process
    let db = FirestoreDb::new(
        &config.firebase_project_id,
        config.firebase_credentials.as_ref(),
    )
    .await
    .expect("Failed to connect to Firestore");

    let stats = StatsService::new(Arc::new(db), config.upstream_timeout);
    let discord = DiscordService::new(&config).expect("Failed to initialize Discord client");
    tracing::info!(
        api_base = %config.discord_api_base,
        timeout_secs = config.upstream_timeout.as_secs(),
        "Discord client initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        discord,
        stats,
    });

    // Build router
    let app = guild_dashboard_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("guild_dashboard_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
