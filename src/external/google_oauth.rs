// ABOUTME: Google OAuth client for the YouTube account linking flow
// ABOUTME: Builds authorization URLs and exchanges one-time codes for token pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Google OAuth client
//!
//! Covers the two server-side steps of the linking flow: building the
//! authorization-request URL the browser is redirected to, and exchanging
//! the returned one-time code for an access/refresh token pair. Tokens are
//! handed back to the caller; nothing is persisted here.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::environment::GoogleOAuthConfig;
use crate::errors::{AppError, AppResult};

/// Google authorization endpoint
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google token endpoint
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Read-only YouTube scope requested for subscription analysis
const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";

/// Access/refresh token pair returned by the exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer token for YouTube Data API calls
    pub access_token: String,
    /// Refresh token; present on first consent only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Token endpoint response (internal)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[allow(dead_code)]
    expires_in: Option<i64>,
}

/// Google OAuth client
#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleOAuthClient {
    /// Create a client from configuration
    #[must_use]
    pub fn new(config: &GoogleOAuthConfig, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: format!("{base_url}/auth/youtube/callback"),
        }
    }

    /// Build the authorization-request URL the browser is sent to
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{AUTH_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent&state={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(YOUTUBE_SCOPE),
            urlencoding::encode(state),
        )
    }

    /// Exchange a one-time authorization code for a token pair
    ///
    /// # Errors
    ///
    /// Returns an external-service error if the token endpoint rejects the
    /// code or the response cannot be parsed.
    pub async fn exchange_code(&self, code: &str) -> AppResult<TokenPair> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Token exchange failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Invalid token response: {e}")))?;

        Ok(TokenPair {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }
}
