// ABOUTME: Health check route for liveness probes
// ABOUTME: Reports service name and version
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::resources::ServerResources;

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(_resources: Arc<ServerResources>) -> Router {
        Router::new().route("/api/health", get(Self::handle_health))
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "innerlens-server",
            "version": env!("CARGO_PKG_VERSION"),
        }))
    }
}
