// ABOUTME: YouTube account linking flow via Google OAuth redirects
// ABOUTME: Initiation and callback handlers; failures redirect with a reason code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! YouTube OAuth linking routes
//!
//! Two browser-facing handlers: `GET /auth/youtube` redirects to Google's
//! consent screen with the read-only YouTube scope; the callback exchanges
//! the one-time code and hands the token pair to the client page, base64
//! encoded in the redirect URL. Nothing is persisted server-side. This
//! surface never answers JSON - every failure becomes a redirect to the
//! onboarding page with a short reason code.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{info, warn};
use uuid::Uuid;

use crate::resources::ServerResources;

/// YouTube linking routes
pub struct OAuthRoutes;

impl OAuthRoutes {
    /// Create the linking flow routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/youtube", get(Self::handle_initiate))
            .route("/auth/youtube/callback", get(Self::handle_callback))
            .with_state(resources)
    }

    /// Redirect the browser to the identity provider's consent screen
    async fn handle_initiate(State(resources): State<Arc<ServerResources>>) -> Redirect {
        let Some(oauth) = resources.oauth.as_ref() else {
            warn!("YouTube linking requested but OAuth is not configured");
            return error_redirect(&resources, "oauth_not_configured");
        };

        let state = Uuid::new_v4().to_string();
        Redirect::to(&oauth.authorization_url(&state))
    }

    /// Exchange the returned code and hand tokens to the client page
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Redirect {
        let Some(oauth) = resources.oauth.as_ref() else {
            return error_redirect(&resources, "oauth_not_configured");
        };

        // Provider-reported refusal (user clicked deny) comes back as an
        // error parameter instead of a code.
        if params.contains_key("error") {
            info!("YouTube linking denied by provider");
            return error_redirect(&resources, "access_denied");
        }

        let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
            return error_redirect(&resources, "no_code");
        };

        let tokens = match oauth.exchange_code(code).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "YouTube token exchange failed");
                return error_redirect(&resources, "token_exchange_failed");
            }
        };

        let Ok(payload) = serde_json::to_string(&tokens) else {
            return error_redirect(&resources, "token_exchange_failed");
        };
        let encoded = STANDARD.encode(payload);

        info!("YouTube account linked, handing tokens to client");
        Redirect::to(&format!(
            "{}/onboarding/report?tokens={}",
            resources.config.base_url,
            urlencoding::encode(&encoded),
        ))
    }
}

/// Redirect to the onboarding page with a short reason code
fn error_redirect(resources: &Arc<ServerResources>, reason: &str) -> Redirect {
    Redirect::to(&format!(
        "{}/onboarding?error={reason}",
        resources.config.base_url
    ))
}
