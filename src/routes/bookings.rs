// ABOUTME: Booking routes covering session requests, slot publication, and coach decisions
// ABOUTME: Confirmation moves booking, slot, and parent purchase together in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Booking routes
//!
//! Users with a coaching purchase request a session by proposing times; a
//! coach confirms the booking onto a published slot (which also confirms
//! the parent purchase and stamps its program start date) or rejects it.
//! Confirmation requires a slot; both transitions are pending-only.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::require_coach;
use crate::{
    errors::{AppError, AppResult},
    models::{Booking, BookingStatus, ProgramKind},
    resources::ServerResources,
};

// ============================================================================
// Request Types
// ============================================================================

/// Session request from a user
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// Coaching purchase this session belongs to
    pub purchase_id: String,
    /// Proposed session times (RFC 3339)
    pub proposed_slots: Vec<String>,
}

/// Coach decision on a booking
#[derive(Debug, Deserialize)]
pub struct BookingDecisionRequest {
    /// `confirm` or `reject`
    pub action: String,
    /// Slot to schedule onto; required when confirming
    #[serde(default)]
    pub slot_id: Option<String>,
    /// External meeting link handed to the user
    #[serde(default)]
    pub meeting_link: Option<String>,
}

/// Slot publication request from a coach
#[derive(Debug, Deserialize)]
pub struct PublishSlotsRequest {
    /// Session start times to open up (RFC 3339)
    pub slots: Vec<String>,
}

// ============================================================================
// Booking Routes
// ============================================================================

/// Booking routes
pub struct BookingRoutes;

impl BookingRoutes {
    /// Create all booking routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/bookings", post(Self::handle_create))
            .route(
                "/api/bookings/:booking_id/decision",
                post(Self::handle_decision),
            )
            .route("/api/slots", get(Self::handle_open_slots))
            .route("/api/coach/slots", post(Self::handle_publish_slots))
            .route("/api/coach/bookings", get(Self::handle_review_queue))
            .with_state(resources)
    }

    /// Create a pending booking for a coaching purchase
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateBookingRequest>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth.authenticate(&headers)?;

        if request.proposed_slots.is_empty() {
            return Err(AppError::invalid_input(
                "At least one proposed time is required",
            ));
        }
        for raw in &request.proposed_slots {
            DateTime::parse_from_rfc3339(raw).map_err(|_| {
                AppError::invalid_input(format!("Invalid proposed time: {raw}"))
            })?;
        }
        let purchase_id = Uuid::parse_str(&request.purchase_id)
            .map_err(|_| AppError::invalid_input("Invalid purchase id"))?;

        let purchase = resources
            .database
            .get_purchase(purchase_id)
            .await?
            .filter(|p| p.user_id == auth.user_id)
            .ok_or_else(|| AppError::not_found(format!("Purchase {purchase_id}")))?;

        if purchase.program != ProgramKind::Coaching {
            return Err(AppError::invalid_input(
                "Only coaching purchases include a session",
            ));
        }

        let booking = resources
            .database
            .create_booking(purchase_id, &request.proposed_slots)
            .await?;

        info!(
            user_id = %auth.user_id,
            booking_id = %booking.id,
            purchase_id = %purchase_id,
            "Booking requested"
        );

        Ok(Json(json!({
            "success": true,
            "booking": booking_view(&booking),
        })))
    }

    /// Apply a coach decision to a pending booking
    async fn handle_decision(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(booking_id): Path<String>,
        Json(request): Json<BookingDecisionRequest>,
    ) -> AppResult<impl IntoResponse> {
        let coach = require_coach(&resources, &headers)?;
        let booking_id = Uuid::parse_str(&booking_id)
            .map_err(|_| AppError::invalid_input("Invalid booking id"))?;

        match request.action.as_str() {
            "confirm" => {
                let slot_id = request
                    .slot_id
                    .as_deref()
                    .ok_or_else(|| {
                        AppError::invalid_input("A slot is required to confirm a booking")
                    })?;
                let slot_id = Uuid::parse_str(slot_id)
                    .map_err(|_| AppError::invalid_input("Invalid slot id"))?;

                resources
                    .database
                    .confirm_booking(
                        booking_id,
                        slot_id,
                        request.meeting_link.as_deref(),
                        &coach.email,
                    )
                    .await?;
            }
            "reject" => {
                resources.database.reject_booking(booking_id).await?;
            }
            other => {
                return Err(AppError::invalid_input(format!("Unknown action: {other}")));
            }
        }

        Ok(Json(json!({ "success": true, "action": request.action })))
    }

    /// List open future slots
    async fn handle_open_slots(
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<impl IntoResponse> {
        let slots = resources.database.list_open_slots(Utc::now()).await?;
        let slots: Vec<_> = slots
            .iter()
            .map(|s| {
                json!({
                    "slot_id": s.id.to_string(),
                    "starts_at": s.starts_at.to_rfc3339(),
                })
            })
            .collect();

        Ok(Json(json!({ "total": slots.len(), "slots": slots })))
    }

    /// Publish bookable slots
    async fn handle_publish_slots(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<PublishSlotsRequest>,
    ) -> AppResult<impl IntoResponse> {
        let coach = require_coach(&resources, &headers)?;

        if request.slots.is_empty() {
            return Err(AppError::invalid_input("At least one slot is required"));
        }
        let mut starts = Vec::with_capacity(request.slots.len());
        for raw in &request.slots {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .map_err(|_| AppError::invalid_input(format!("Invalid slot time: {raw}")))?;
            starts.push(parsed.with_timezone(&Utc));
        }

        let created = resources.database.create_slots(&starts).await?;
        info!(coach = %coach.email, created, "Slots published");

        Ok(Json(json!({ "success": true, "created": created })))
    }

    /// Coach review queue, filterable by status
    async fn handle_review_queue(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> AppResult<impl IntoResponse> {
        require_coach(&resources, &headers)?;

        let status = params
            .get("status")
            .map_or(Some(BookingStatus::Pending), |raw| {
                BookingStatus::parse(raw)
            })
            .ok_or_else(|| AppError::invalid_input("Unknown status filter"))?;

        let bookings = resources.database.list_bookings_by_status(status).await?;
        let bookings: Vec<_> = bookings.iter().map(booking_view).collect();

        Ok(Json(json!({
            "total": bookings.len(),
            "bookings": bookings,
        })))
    }
}

/// Client-facing booking projection
fn booking_view(booking: &Booking) -> serde_json::Value {
    json!({
        "booking_id": booking.id.to_string(),
        "purchase_id": booking.purchase_id.to_string(),
        "proposed_slots": booking.proposed_slots,
        "status": booking.status,
        "confirmed_slot": booking.confirmed_slot.map(|t| t.to_rfc3339()),
        "meeting_link": booking.meeting_link,
        "confirmed_by": booking.confirmed_by,
        "confirmed_at": booking.confirmed_at.map(|t| t.to_rfc3339()),
    })
}
