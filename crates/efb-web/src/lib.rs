//! Registration web server.
//!
//! Serves the link the bot hands out (`/register/`), bounces the user through EVE SSO
//! and links the character on the way back (`/callback/`).

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

pub mod error;
pub mod handlers;
pub mod pending;
pub mod state;

pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", get(handlers::register_handler))
        .route("/register/", get(handlers::register_handler))
        .route("/callback", get(handlers::callback_handler))
        .route("/callback/", get(handlers::callback_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
}

/// Bind `addr` and serve the registration routes until the server fails.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind registration server to {addr}"))?;
    info!(address = %addr, "registration server listening");

    axum::serve(listener, build_router(state))
        .await
        .context("registration server error")
}
