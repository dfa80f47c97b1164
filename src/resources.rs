// ABOUTME: Shared server resources passed to every route handler
// ABOUTME: Bundles database, configuration, auth, role registry, and external clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Shared server resources
//!
//! One [`ServerResources`] is built at startup and handed to every route
//! group behind an `Arc`. Optional integrations are `None` when their
//! configuration is absent; handlers translate that into feature-disabled
//! responses.

use std::sync::Arc;

use crate::{
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    external::{AiClient, GoogleOAuthClient, PaymentGateway},
    permissions::CoachRegistry,
};

/// Everything a route handler needs, built once at startup
pub struct ServerResources {
    /// Database connection pool
    pub database: Database,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Session token manager
    pub auth: AuthManager,
    /// Coach role allow-list
    pub coaches: CoachRegistry,
    /// Google OAuth client, when configured
    pub oauth: Option<GoogleOAuthClient>,
    /// AI completion client, when configured
    pub ai: Option<AiClient>,
    /// Payment gateway seam
    pub gateway: PaymentGateway,
}

impl ServerResources {
    /// Assemble resources from configuration and a connected database
    #[must_use]
    pub fn new(config: ServerConfig, database: Database) -> Self {
        let auth = AuthManager::new(&config.jwt_secret);
        let coaches = CoachRegistry::new(&config.coach_emails);
        let oauth = config
            .google_oauth
            .as_ref()
            .map(|oauth| GoogleOAuthClient::new(oauth, &config.base_url));
        let ai = config.ai.as_ref().map(AiClient::new);
        let gateway = PaymentGateway::new(config.gateway.as_ref());

        Self {
            database,
            config: Arc::new(config),
            auth,
            coaches,
            oauth,
            ai,
            gateway,
        }
    }
}
