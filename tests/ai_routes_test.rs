// ABOUTME: Integration tests for the AI chat and vision pass-through endpoints
// ABOUTME: Verifies feature gating and input validation without a live completion service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create_test_app, create_test_user, post_json, token_for};

#[tokio::test]
async fn ai_endpoints_are_gated_when_unconfigured() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "member@example.com").await.unwrap();
    let token = token_for(&resources, &user);

    let (status, body) = post_json(
        &router,
        "/api/ai/chat",
        Some(&token),
        json!({ "messages": [{ "role": "user", "content": "hello" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "feature_disabled");

    let (status, _) = post_json(
        &router,
        "/api/reports",
        Some(&token),
        json!({ "subscriptions": [{ "title": "Veritasium" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn ai_endpoints_require_authentication() {
    let (router, _resources) = create_test_app().await.unwrap();

    let (status, _) = post_json(
        &router,
        "/api/ai/chat",
        None,
        json!({ "messages": [{ "role": "user", "content": "hello" }] }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn report_generation_requires_subscriptions() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "member@example.com").await.unwrap();
    let token = token_for(&resources, &user);

    // Validation runs before the feature gate would answer 503
    let (status, body) = post_json(
        &router,
        "/api/reports",
        Some(&token),
        json!({ "subscriptions": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");
}
