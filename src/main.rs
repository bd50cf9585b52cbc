//! Storefront - e-commerce CRUD backend
//! Users, categories, items and orders behind JWT-gated routes

use anyhow::{Context, Result};
use clap::Parser;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_backend::{
    api::{create_router, AppState},
    auth::{JwtHandler, PasswordHasher},
    config::{load_env, Config},
    store::Store,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::parse();
    info!("🚀 Storefront backend v{} starting", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(Store::open(&config.database_path).context("Failed to open database")?);
    let hasher =
        PasswordHasher::new(config.bcrypt_cost).context("Failed to initialize password hashing")?;
    let tokens = JwtHandler::new(&config.jwt_secret, config.token_ttl_hours);
    info!(
        "🔐 Authentication initialized (token ttl {}h, bcrypt cost {})",
        config.token_ttl_hours,
        hasher.cost()
    );

    let state = AppState::new(store, tokens, hasher);

    if let Some((login, password)) = config.admin_credentials() {
        state
            .users
            .ensure_admin(login, password)
            .await
            .context("Failed to bootstrap admin account")?;
    }

    let app = create_router(state, config.request_timeout());

    // Start server
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("👋 Server stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info,storefront_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
