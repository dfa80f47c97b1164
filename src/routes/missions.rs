// ABOUTME: Guided mission submission routes for core-belief and cognitive-error answers
// ABOUTME: Append-only per-user answer blobs with owner-scoped listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Mission submission routes
//!
//! Each guided mission collects free-form answers. Submissions append;
//! nothing is updated or deleted, so a user's history through a mission
//! stays intact.

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

use crate::{
    errors::{AppError, AppResult},
    models::MissionKind,
    resources::ServerResources,
};

/// Mission submission request
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Free-form answers for the mission
    pub answers: serde_json::Value,
}

/// Mission routes
pub struct MissionRoutes;

impl MissionRoutes {
    /// Create all mission routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/missions/:mission/submissions",
                post(Self::handle_submit),
            )
            .route(
                "/api/missions/:mission/submissions",
                get(Self::handle_list),
            )
            .with_state(resources)
    }

    /// Append a submission for a mission
    async fn handle_submit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(mission): Path<String>,
        Json(request): Json<SubmitRequest>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth.authenticate(&headers)?;
        let mission = MissionKind::parse(&mission)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown mission: {mission}")))?;

        if request.answers.is_null() {
            return Err(AppError::invalid_input("Answers are required"));
        }

        let record = resources
            .database
            .create_submission(auth.user_id, mission, &request.answers)
            .await?;

        info!(
            user_id = %auth.user_id,
            mission = mission.as_str(),
            submission_id = %record.id,
            "Mission submission stored"
        );

        Ok(Json(json!({
            "success": true,
            "submission_id": record.id.to_string(),
            "created_at": record.created_at.to_rfc3339(),
        })))
    }

    /// List the caller's submissions for a mission, newest first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(mission): Path<String>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth.authenticate(&headers)?;
        let mission = MissionKind::parse(&mission)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown mission: {mission}")))?;

        let submissions = resources
            .database
            .list_submissions(auth.user_id, mission)
            .await?;
        let submissions: Vec<_> = submissions
            .iter()
            .map(|s| {
                json!({
                    "submission_id": s.id.to_string(),
                    "answers": s.answers,
                    "created_at": s.created_at.to_rfc3339(),
                })
            })
            .collect();

        Ok(Json(json!({
            "total": submissions.len(),
            "submissions": submissions,
        })))
    }
}
