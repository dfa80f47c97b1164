// ABOUTME: Payment routes covering intent creation, coach purchase decisions, and the gateway stub
// ABOUTME: Manual bank-transfer checkout with duplicate-intent suppression per assessment result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Payment routes
//!
//! Checkout creates a pending purchase (the payment intent) tied to an
//! assessment result the caller owns; repeated checkouts against the same
//! result return the already-live intent instead of inserting a duplicate.
//! Coaches reconcile manual deposits through the decision endpoint. The
//! gateway endpoints stay a 503 stub until the vendor integration lands.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::require_coach;
use crate::{
    errors::{AppError, AppResult},
    models::{ProgramKind, Purchase, PurchaseStatus},
    resources::ServerResources,
};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Payment intent request from checkout
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    /// Assessment result this purchase unlocks
    pub assessment_result_id: String,
    /// Program being purchased (`report` or `coaching`)
    pub program: String,
    /// Amount in minor currency units
    pub amount: i64,
    /// Payment method hint; defaults to manual bank transfer
    #[serde(default = "default_method")]
    pub method: String,
    /// Depositor display name for transfer reconciliation
    pub depositor_name: String,
}

fn default_method() -> String {
    "bank_transfer".to_owned()
}

/// Coach decision on a purchase
#[derive(Debug, Deserialize)]
pub struct PurchaseDecisionRequest {
    /// `confirm` or `reject`
    pub action: String,
}

/// Manual transfer details shown at checkout
#[derive(Debug, Serialize)]
pub struct BankTransferInfo {
    /// Name on the receiving account
    pub account_holder: String,
    /// Bank name
    pub bank_name: String,
    /// Account number to transfer to
    pub account_number: String,
}

// ============================================================================
// Payment Routes
// ============================================================================

/// Payment routes
pub struct PaymentRoutes;

impl PaymentRoutes {
    /// Create all payment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/purchases", post(Self::handle_create_intent))
            .route("/api/purchases/:purchase_id", get(Self::handle_get))
            .route(
                "/api/purchases/:purchase_id/decision",
                post(Self::handle_decision),
            )
            .route("/api/coach/purchases", get(Self::handle_review_queue))
            .route(
                "/api/payments/gateway/approve",
                post(Self::handle_gateway_approve),
            )
            .route(
                "/api/payments/gateway/cancel",
                post(Self::handle_gateway_cancel),
            )
            .with_state(resources)
    }

    /// Create a payment intent at checkout
    async fn handle_create_intent(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreatePurchaseRequest>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth.authenticate(&headers)?;

        let program = ProgramKind::parse(&request.program)
            .ok_or_else(|| AppError::invalid_input("Unknown program"))?;
        if request.amount <= 0 {
            return Err(AppError::invalid_input("Amount must be positive"));
        }
        if request.depositor_name.trim().is_empty() {
            return Err(AppError::invalid_input("Depositor name is required"));
        }
        let assessment_result_id = Uuid::parse_str(&request.assessment_result_id)
            .map_err(|_| AppError::invalid_input("Invalid assessment result id"))?;

        // The referenced result must exist and belong to the caller
        resources
            .database
            .get_assessment_result(assessment_result_id)
            .await?
            .filter(|r| r.user_id == auth.user_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Assessment result {assessment_result_id}"))
            })?;

        let outcome = resources
            .database
            .create_purchase_intent(
                auth.user_id,
                assessment_result_id,
                program,
                request.amount,
                &request.method,
                request.depositor_name.trim(),
            )
            .await?;

        if outcome.created {
            info!(
                user_id = %auth.user_id,
                purchase_id = %outcome.purchase.id,
                order_code = %outcome.purchase.order_code,
                "Payment intent created"
            );
        } else {
            info!(
                user_id = %auth.user_id,
                purchase_id = %outcome.purchase.id,
                "Returning existing live payment intent"
            );
        }

        let bank_transfer = (!resources.config.gateway_enabled()).then(|| {
            let details = &resources.config.bank_transfer;
            BankTransferInfo {
                account_holder: details.account_holder.clone(),
                bank_name: details.bank_name.clone(),
                account_number: details.account_number.clone(),
            }
        });

        Ok(Json(json!({
            "success": true,
            "purchase_id": outcome.purchase.id.to_string(),
            "order_code": outcome.purchase.order_code,
            "status": outcome.purchase.status,
            "created": outcome.created,
            "bank_transfer": bank_transfer,
        })))
    }

    /// Fetch a purchase; owners see their own, coaches see any
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(purchase_id): Path<String>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth.authenticate(&headers)?;
        let purchase_id = Uuid::parse_str(&purchase_id)
            .map_err(|_| AppError::invalid_input("Invalid purchase id"))?;

        let purchase = resources
            .database
            .get_purchase(purchase_id)
            .await?
            .filter(|p| {
                p.user_id == auth.user_id || resources.coaches.is_coach(Some(&auth.email))
            })
            .ok_or_else(|| AppError::not_found(format!("Purchase {purchase_id}")))?;

        Ok(Json(json!({ "purchase": purchase_view(&purchase) })))
    }

    /// Apply a coach decision to a pending purchase
    async fn handle_decision(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(purchase_id): Path<String>,
        Json(request): Json<PurchaseDecisionRequest>,
    ) -> AppResult<impl IntoResponse> {
        let coach = require_coach(&resources, &headers)?;
        let purchase_id = Uuid::parse_str(&purchase_id)
            .map_err(|_| AppError::invalid_input("Invalid purchase id"))?;

        match request.action.as_str() {
            "confirm" => {
                let purchase = resources
                    .database
                    .confirm_purchase(purchase_id, &coach.email)
                    .await?;
                info!(
                    purchase_id = %purchase_id,
                    coach = %coach.email,
                    starts_on = ?purchase.program_starts_on,
                    "Purchase confirmed"
                );
            }
            "reject" => {
                resources
                    .database
                    .reject_purchase(purchase_id, &coach.email)
                    .await?;
                info!(purchase_id = %purchase_id, coach = %coach.email, "Purchase rejected");
            }
            other => {
                return Err(AppError::invalid_input(format!("Unknown action: {other}")));
            }
        }

        Ok(Json(json!({ "success": true, "action": request.action })))
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
            .map_or(Some(PurchaseStatus::Pending), |raw| {
                PurchaseStatus::parse(raw)
            })
            .ok_or_else(|| AppError::invalid_input("Unknown status filter"))?;

        let purchases = resources.database.list_purchases_by_status(status).await?;
        let purchases: Vec<_> = purchases.iter().map(purchase_view).collect();

        Ok(Json(json!({
            "total": purchases.len(),
            "purchases": purchases,
        })))
    }

    /// Gateway approval stub
    async fn handle_gateway_approve(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        resources.auth.authenticate(&headers)?;
        resources.gateway.approve()?;
        Ok(Json(json!({ "success": true })))
    }

    /// Gateway cancellation stub
    async fn handle_gateway_cancel(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        resources.auth.authenticate(&headers)?;
        resources.gateway.cancel()?;
        Ok(Json(json!({ "success": true })))
    }
}

/// Client-facing purchase projection
fn purchase_view(purchase: &Purchase) -> serde_json::Value {
    json!({
        "purchase_id": purchase.id.to_string(),
        "assessment_result_id": purchase.assessment_result_id.to_string(),
        "program": purchase.program,
        "amount": purchase.amount,
        "method": purchase.method,
        "depositor_name": purchase.depositor_name,
        "order_code": purchase.order_code,
        "status": purchase.status,
        "created_at": purchase.created_at.to_rfc3339(),
        "confirmed_at": purchase.confirmed_at.map(|t| t.to_rfc3339()),
        "confirmed_by": purchase.confirmed_by,
        "program_starts_on": purchase.program_starts_on,
    })
}
