// src/server/mod.rs
//! Recipe server: the recipe book exposed over HTTP
//!
//! The server is a thin pass-through. Each request runs one recipe book
//! operation on the blocking pool, so the same read-modify-write rules apply
//! to remote callers as to local ones.

mod handlers;
mod routes;

pub use routes::{SharedState, create_router};

use crate::recipe::RecipeBook;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

/// Shared server state
#[derive(Debug, Clone)]
pub struct ServerState {
    pub book: RecipeBook,
}

impl ServerState {
    pub fn new(book: RecipeBook) -> Self {
        Self { book }
    }
}

/// Bind and serve until ctrl-c
pub async fn run_server(config: ServerConfig, book: RecipeBook) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to listen on {}", config.bind_addr))?;

    tracing::info!("Recipe server listening on {}", config.bind_addr);
    tracing::info!("Serving bucket '{}'", book.bucket());

    let app = create_router(Arc::new(ServerState::new(book)));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Recipe server failed")?;

    tracing::info!("Recipe server stopped");
    Ok(())
}

/// Serve on an already bound listener until the process exits
pub async fn serve(listener: tokio::net::TcpListener, book: RecipeBook) -> Result<()> {
    let app = create_router(Arc::new(ServerState::new(book)));
    axum::serve(listener, app)
        .await
        .context("Recipe server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
