// ABOUTME: AI chat and vision route handlers, stateless pass-throughs to the completion service
// ABOUTME: Fixed coaching preambles plus caller content; no retry, no streaming
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! AI conversation routes
//!
//! Stateless pass-throughs: a fixed instructional preamble is prepended to
//! the caller-supplied content and the completion comes straight back. No
//! conversation state is stored server-side.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    errors::{AppError, AppResult},
    external::ai_client::{AiClient, ChatMessage, COACHING_PREAMBLE, VISION_PREAMBLE},
    resources::ServerResources,
};

/// Chat completion request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far; roles must be `user` or `assistant`
    pub messages: Vec<ChatMessage>,
}

/// Vision completion request
#[derive(Debug, Deserialize)]
pub struct VisionRequest {
    /// Text prompt accompanying the image
    pub prompt: String,
    /// Image as a data URL or fetchable URL
    pub image: String,
}

/// AI conversation routes
pub struct AiRoutes;

impl AiRoutes {
    /// Create all AI routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ai/chat", post(Self::handle_chat))
            .route("/api/ai/vision", post(Self::handle_vision))
            .with_state(resources)
    }

    /// Handle a chat completion
    async fn handle_chat(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<ChatRequest>,
    ) -> AppResult<impl IntoResponse> {
        resources.auth.authenticate(&headers)?;
        let ai = require_ai(&resources)?;

        if request.messages.is_empty() {
            return Err(AppError::invalid_input("At least one message is required"));
        }
        if request
            .messages
            .iter()
            .any(|m| m.role != "user" && m.role != "assistant")
        {
            return Err(AppError::invalid_input(
                "Message roles must be user or assistant",
            ));
        }

        let content = ai.complete(COACHING_PREAMBLE, &request.messages).await?;
        Ok(Json(json!({ "content": content })))
    }

    /// Handle a vision completion
    async fn handle_vision(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<VisionRequest>,
    ) -> AppResult<impl IntoResponse> {
        resources.auth.authenticate(&headers)?;
        let ai = require_ai(&resources)?;

        if request.prompt.trim().is_empty() || request.image.trim().is_empty() {
            return Err(AppError::invalid_input("Prompt and image are required"));
        }

        let content = ai
            .complete_vision(VISION_PREAMBLE, &request.prompt, &request.image)
            .await?;
        Ok(Json(json!({ "content": content })))
    }
}

fn require_ai(resources: &Arc<ServerResources>) -> AppResult<&AiClient> {
    resources
        .ai
        .as_ref()
        .ok_or_else(|| AppError::feature_disabled("AI endpoints are not configured"))
}
