//! Polyfetch API Server
//!
//! HTTP API server exposing Polymarket market data and betting statistics.

mod config;
mod routes;

use axum::{http::Method, Router};
use polyfetch_gamma::GammaClient;
use polyfetch_services::{MarketService, StatsEngine};
use polyfetch_subgraph::SubgraphClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ApiConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub market_service: Arc<MarketService>,
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    // Read-only API, open to any frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_state(config: &ApiConfig) -> anyhow::Result<AppState> {
    let catalog = GammaClient::with_config(&config.gamma_url, config.catalog_timeout)?;
    info!("Catalog: {}", catalog.base_url());

    let stats = if config.ledger_enabled {
        let ledger = SubgraphClient::with_config(&config.subgraph_url, config.ledger_timeout)?;
        info!("Ledger: {}", ledger.endpoint());
        StatsEngine::new(Arc::new(ledger))
    } else {
        warn!("Ledger disabled - market stats will be derived from prices only");
        StatsEngine::price_only()
    };

    Ok(AppState {
        market_service: Arc::new(MarketService::new(Arc::new(catalog), stats)),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,polyfetch_api=debug")),
        )
        .init();

    info!("Starting Polyfetch API");

    let config = ApiConfig::from_env()?;
    let state = build_state(&config)?;
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);
    info!("  GET /api/health");
    info!("  GET /api/markets?limit&offset");
    info!("  GET /api/markets/search?q&limit");
    info!("  GET /api/market/{{id}}");
    info!("  GET /api/market/{{id}}/stats");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
