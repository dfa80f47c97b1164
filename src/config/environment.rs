// ABOUTME: Environment-driven server configuration loaded once at process start
// ABOUTME: Collects HTTP, database, OAuth, AI, payment, and coach allow-list settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Server configuration
//!
//! [`ServerConfig::from_env`] is called once from the binary; every component
//! receives the resulting struct (behind an `Arc`) instead of reading the
//! environment ad hoc. Optional integrations (YouTube OAuth, AI completion,
//! payment gateway) degrade to explicit feature-disabled errors when their
//! credentials are absent.

use std::env;

use tracing::{info, warn};

use crate::errors::{AppError, AppResult};

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default public base URL for browser redirects
const DEFAULT_BASE_URL: &str = "http://localhost:8081";

/// Default sqlite database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/innerlens.db";

/// Default OpenAI-compatible completion endpoint
const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model
const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

/// Static account details for the manual bank-transfer fallback
#[derive(Debug, Clone)]
pub struct BankTransferDetails {
    /// Name on the receiving account
    pub account_holder: String,
    /// Bank name
    pub bank_name: String,
    /// Account number shown to depositors
    pub account_number: String,
}

/// Google OAuth client credentials for the YouTube linking flow
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
}

/// Completion service configuration
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for the completion service
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Model identifier
    pub model: String,
}

/// Payment gateway merchant credentials
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Merchant identifier issued by the vendor
    pub merchant_id: String,
    /// Merchant API key issued by the vendor
    pub merchant_key: String,
}

/// Complete server configuration, built once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Public base URL used for browser redirects
    pub base_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Database connection string
    pub database_url: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Google OAuth client, if configured
    pub google_oauth: Option<GoogleOAuthConfig>,
    /// Completion service, if configured
    pub ai: Option<AiConfig>,
    /// Payment gateway credentials, if configured
    pub gateway: Option<GatewayConfig>,
    /// Manual bank-transfer account details
    pub bank_transfer: BankTransferDetails,
    /// Comma-separated coach email allow-list, as provided
    pub coach_emails: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable (`JWT_SECRET`) is missing or
    /// a numeric variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid HTTP_PORT '{raw}': {e}")))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::config("JWT_SECRET must be set"))?;

        let google_oauth = match (env::var("GOOGLE_CLIENT_ID"), env::var("GOOGLE_CLIENT_SECRET")) {
            (Ok(client_id), Ok(client_secret)) => Some(GoogleOAuthConfig {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let ai = env::var("AI_API_KEY").ok().map(|api_key| AiConfig {
            api_key,
            base_url: env::var("AI_BASE_URL").unwrap_or_else(|_| DEFAULT_AI_BASE_URL.to_owned()),
            model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_owned()),
        });

        let gateway = match (env::var("PAYMENT_MERCHANT_ID"), env::var("PAYMENT_MERCHANT_KEY")) {
            (Ok(merchant_id), Ok(merchant_key)) => Some(GatewayConfig {
                merchant_id,
                merchant_key,
            }),
            _ => None,
        };

        let bank_transfer = BankTransferDetails {
            account_holder: env::var("BANK_ACCOUNT_HOLDER")
                .unwrap_or_else(|_| "Innerlens Inc.".to_owned()),
            bank_name: env::var("BANK_NAME").unwrap_or_else(|_| "Innerlens Partner Bank".to_owned()),
            account_number: env::var("BANK_ACCOUNT_NUMBER")
                .unwrap_or_else(|_| "000-0000-0000".to_owned()),
        };

        let coach_emails = env::var("COACH_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let config = Self {
            base_url: env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
            http_port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
            jwt_secret,
            google_oauth,
            ai,
            gateway,
            bank_transfer,
            coach_emails,
        };

        config.log_summary();
        Ok(config)
    }

    /// Whether the YouTube OAuth linking flow is configured
    #[must_use]
    pub const fn youtube_oauth_enabled(&self) -> bool {
        self.google_oauth.is_some()
    }

    /// Whether AI-backed endpoints are configured
    #[must_use]
    pub const fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Whether payment gateway credentials are present
    #[must_use]
    pub const fn gateway_enabled(&self) -> bool {
        self.gateway.is_some()
    }

    /// Whether the public base URL is served over HTTPS (drives cookie flags)
    #[must_use]
    pub fn uses_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    fn log_summary(&self) {
        info!(
            port = self.http_port,
            base_url = %self.base_url,
            "Server configuration loaded"
        );
        if !self.youtube_oauth_enabled() {
            warn!("GOOGLE_CLIENT_ID/SECRET not set - YouTube linking disabled");
        }
        if !self.ai_enabled() {
            warn!("AI_API_KEY not set - AI endpoints disabled");
        }
        if !self.gateway_enabled() {
            info!("Payment gateway not configured - manual bank transfer only");
        }
        if self.coach_emails.is_empty() {
            warn!("COACH_EMAILS not set - no coach will be able to confirm bookings");
        }
    }
}
