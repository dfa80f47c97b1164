// ABOUTME: OpenAI-compatible completion client for report, chat, and vision requests
// ABOUTME: Synchronous pass-through calls with JSON salvage for fenced model output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! AI completion client
//!
//! Thin client over an OpenAI-compatible chat-completions API. Each call
//! assembles a fixed instructional preamble plus caller-supplied content
//! and returns the raw or JSON-parsed response. No retry, no streaming;
//! timeouts are whatever the underlying HTTP client provides.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::config::environment::AiConfig;
use crate::errors::{AppError, AppResult};

/// Preamble for personality report generation from YouTube subscriptions
pub const REPORT_PREAMBLE: &str = "You are a psychological profiling assistant. \
Given a person's YouTube channel subscriptions, infer their interests, values, \
and likely personality traits. Be specific and grounded in the subscription \
list; avoid horoscope-style generalities. Respond with a single JSON object \
with fields: \"summary\" (one sentence), \"traits\" (array of {name, evidence}), \
\"interests\" (array of strings), and \"coaching_focus\" (one paragraph).";

/// Preamble for the conversational coaching endpoint
pub const COACHING_PREAMBLE: &str = "You are a supportive cognitive-behavioral \
coaching assistant for the Innerlens platform. Help the user examine their \
core beliefs and cognitive errors with warmth and precision. Never give \
medical advice; suggest professional help for anything clinical.";

/// Preamble for vision-assisted reflection (journal photos, worksheets)
pub const VISION_PREAMBLE: &str = "You are a coaching assistant reading a \
user-submitted image of a worksheet or journal page. Describe what the user \
wrote and offer one gentle, concrete reflection question.";

/// A single conversational message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: system, user, or assistant
    pub role: String,
    /// Message text
    pub content: String,
}

/// Completion API response (internal)
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// AI completion client
#[derive(Clone)]
pub struct AiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AiClient {
    /// Create a client from configuration
    #[must_use]
    pub fn new(config: &AiConfig) -> Self {
        Self {
            http: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
        }
    }

    /// Model identifier this client completes with
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run a completion over a preamble plus conversation
    ///
    /// # Errors
    ///
    /// Returns an external-service error on transport failure, non-success
    /// status, or an empty completion.
    pub async fn complete(&self, preamble: &str, messages: &[ChatMessage]) -> AppResult<String> {
        let mut wire_messages = vec![json!({ "role": "system", "content": preamble })];
        for message in messages {
            wire_messages.push(json!({ "role": message.role, "content": message.content }));
        }

        self.request(json!({
            "model": self.model,
            "messages": wire_messages,
        }))
        .await
    }

    /// Run a completion expected to return a single JSON object
    ///
    /// Models sometimes wrap JSON in markdown fences; one salvage pass
    /// extracts the outermost object before giving up.
    ///
    /// # Errors
    ///
    /// Returns an external-service error if the call fails or the response
    /// is not parseable JSON.
    pub async fn complete_json(&self, preamble: &str, user_content: &str) -> AppResult<Value> {
        let raw = self
            .complete(
                preamble,
                &[ChatMessage {
                    role: "user".to_owned(),
                    content: user_content.to_owned(),
                }],
            )
            .await?;

        parse_json_response(&raw).ok_or_else(|| {
            warn!(
                "Completion was not parseable JSON ({} bytes)",
                raw.len()
            );
            AppError::external_service("Completion service returned malformed JSON")
        })
    }

    /// Run a completion over a text prompt plus an attached image
    ///
    /// `image_data_url` must be a `data:` URL or a fetchable image URL, per
    /// the vision content-part wire format.
    ///
    /// # Errors
    ///
    /// Returns an external-service error on transport failure, non-success
    /// status, or an empty completion.
    pub async fn complete_vision(
        &self,
        preamble: &str,
        prompt: &str,
        image_data_url: &str,
    ) -> AppResult<String> {
        self.request(json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": preamble },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": prompt },
                        { "type": "image_url", "image_url": { "url": image_data_url } }
                    ]
                }
            ],
        }))
        .await
    }

    async fn request(&self, body: Value) -> AppResult<String> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Completion request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::external_service(format!(
                "Completion service returned {status}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Invalid completion response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::external_service("Completion service returned no content"))
    }
}

/// Parse a model response as JSON, salvaging fenced or wrapped output
fn parse_json_response(raw: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Some(value);
    }

    // Models sometimes wrap JSON in ```json fences; extract the outermost
    // object and retry once.
    let trimmed = raw.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}
