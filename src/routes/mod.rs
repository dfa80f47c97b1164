// ABOUTME: Route module organization for Innerlens HTTP endpoints
// ABOUTME: Groups route definitions by domain with thin handlers over the service layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Route modules
//!
//! Each domain exposes a unit struct with a
//! `routes(Arc<ServerResources>) -> Router` constructor; the server merges
//! them into one application router. Handlers stay thin: authenticate,
//! validate, delegate, translate.

use axum::http::HeaderMap;
use std::sync::Arc;

use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    resources::ServerResources,
};

/// AI chat and vision pass-through endpoints
pub mod ai;
/// Registration, login, and session endpoints
pub mod auth;
/// Booking creation, slots, and the coach decision endpoint
pub mod bookings;
/// Liveness endpoint
pub mod health;
/// Guided mission submission endpoints
pub mod missions;
/// YouTube account linking redirect flow
pub mod oauth;
/// Payment intents, purchase decisions, and the gateway stub
pub mod payments;
/// Personality report generation and retrieval
pub mod reports;

pub use ai::AiRoutes;
pub use auth::AuthRoutes;
pub use bookings::BookingRoutes;
pub use health::HealthRoutes;
pub use missions::MissionRoutes;
pub use oauth::OAuthRoutes;
pub use payments::PaymentRoutes;
pub use reports::ReportRoutes;

/// Authenticate the request and require the coach role
///
/// # Errors
///
/// Returns 401 for a missing/invalid session and 403 when the
/// authenticated email is not on the coach allow-list.
pub(crate) fn require_coach(
    resources: &Arc<ServerResources>,
    headers: &HeaderMap,
) -> AppResult<AuthUser> {
    let auth = resources.auth.authenticate(headers)?;
    if !resources.coaches.is_coach(Some(&auth.email)) {
        return Err(AppError::permission_denied("Coach role required"));
    }
    Ok(auth)
}
