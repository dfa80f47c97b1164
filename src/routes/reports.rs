// ABOUTME: Personality report routes generating assessments from YouTube subscriptions
// ABOUTME: Synchronous AI completion, persisted as assessment results with owner-scoped reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Personality report routes
//!
//! `POST /api/reports` turns a subscription list into a structured
//! personality report via one synchronous completion call and stores it as
//! an assessment result - the record purchases later reference.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    external::ai_client::REPORT_PREAMBLE,
    resources::ServerResources,
};

/// One subscribed channel as submitted by the client
#[derive(Debug, Deserialize)]
pub struct SubscriptionItem {
    /// Channel title
    pub title: String,
    /// Channel description, when the client has it
    #[serde(default)]
    pub description: Option<String>,
}

/// Report generation request
#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    /// The caller's channel subscriptions
    pub subscriptions: Vec<SubscriptionItem>,
}

/// Personality report routes
pub struct ReportRoutes;

impl ReportRoutes {
    /// Create all report routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/reports", post(Self::handle_generate))
            .route("/api/reports/:report_id", get(Self::handle_get))
            .with_state(resources)
    }

    /// Generate and persist a personality report
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<GenerateReportRequest>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth.authenticate(&headers)?;

        if request.subscriptions.is_empty() {
            return Err(AppError::invalid_input(
                "At least one subscription is required",
            ));
        }

        let ai = resources
            .ai
            .as_ref()
            .ok_or_else(|| AppError::feature_disabled("AI report generation is not configured"))?;

        let mut content = String::from("Channel subscriptions:\n");
        for item in &request.subscriptions {
            let _ = match item.description.as_deref() {
                Some(description) => writeln!(content, "- {}: {description}", item.title),
                None => writeln!(content, "- {}", item.title),
            };
        }

        let report = ai.complete_json(REPORT_PREAMBLE, &content).await?;
        let summary = report
            .get("summary")
            .and_then(|v| v.as_str())
            .unwrap_or("Personality report")
            .to_owned();

        let record = resources
            .database
            .create_assessment_result(auth.user_id, &summary, &report, ai.model())
            .await?;

        info!(
            user_id = %auth.user_id,
            report_id = %record.id,
            subscriptions = request.subscriptions.len(),
            "Personality report generated"
        );

        Ok(Json(json!({
            "success": true,
            "report_id": record.id.to_string(),
            "summary": record.summary,
            "report": record.report,
        })))
    }

    /// Fetch one of the caller's reports
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(report_id): Path<String>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth.authenticate(&headers)?;
        let report_id = Uuid::parse_str(&report_id)
            .map_err(|_| AppError::invalid_input("Invalid report id"))?;

        let record = resources
            .database
            .get_assessment_result(report_id)
            .await?
            .filter(|r| r.user_id == auth.user_id)
            .ok_or_else(|| AppError::not_found(format!("Report {report_id}")))?;

        Ok(Json(json!({
            "report_id": record.id.to_string(),
            "summary": record.summary,
            "report": record.report,
            "model": record.model,
            "created_at": record.created_at.to_rfc3339(),
        })))
    }
}
