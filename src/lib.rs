// ABOUTME: Main library entry point for the Innerlens platform backend
// ABOUTME: Serves personality reports, coaching bookings, and manual-transfer payments over REST
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

#![deny(unsafe_code)]

//! # Innerlens Server
//!
//! Backend for the Innerlens consumer platform: users link a YouTube
//! account, generate an AI personality report from their subscriptions,
//! purchase a program via manual bank transfer, book a counseling session
//! with a coach, and work through guided missions.
//!
//! ## Architecture
//!
//! - **Routes**: thin axum handlers organized by domain
//! - **Database**: `SQLite` via sqlx with idempotent startup migrations
//! - **External**: Google OAuth, an OpenAI-compatible completion API, and
//!   a payment-gateway seam (stubbed until the vendor integration lands)
//! - **Config**: environment variables read once at startup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use innerlens_server::config::ServerConfig;
//! use innerlens_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Innerlens server configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Session authentication and token management
pub mod auth;

/// Configuration management
pub mod config;

/// Database layer with per-domain operations
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// External API clients (Google OAuth, AI completion, payment gateway)
pub mod external;

/// Production logging and structured output
pub mod logging;

/// Common data models for platform records
pub mod models;

/// Coach role resolution from the configured allow-list
pub mod permissions;

/// Shared server resources passed to route handlers
pub mod resources;

/// `HTTP` routes organized by domain
pub mod routes;

/// Security utilities (session cookies)
pub mod security;

/// HTTP server assembly and lifecycle
pub mod server;
