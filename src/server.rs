// ABOUTME: HTTP server assembly and lifecycle
// ABOUTME: Merges all route groups, applies middleware layers, and serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! HTTP server
//!
//! [`build_router`] merges every route group over the shared resources and
//! applies tracing and CORS layers; [`serve`] binds the configured port and
//! runs until ctrl-c.

use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    errors::{AppError, AppResult},
    resources::ServerResources,
    routes::{
        AiRoutes, AuthRoutes, BookingRoutes, HealthRoutes, MissionRoutes, OAuthRoutes,
        PaymentRoutes, ReportRoutes,
    },
};

/// Build the full application router
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(OAuthRoutes::routes(resources.clone()))
        .merge(ReportRoutes::routes(resources.clone()))
        .merge(AiRoutes::routes(resources.clone()))
        .merge(PaymentRoutes::routes(resources.clone()))
        .merge(BookingRoutes::routes(resources.clone()))
        .merge(MissionRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind the configured port and serve until shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let router = build_router(resources);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Innerlens server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
