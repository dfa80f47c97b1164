// ABOUTME: Integration tests for guided mission submissions
// ABOUTME: Verifies append-only behavior, mission validation, and per-user isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create_test_app, create_test_user, get_json, post_json, token_for};

#[tokio::test]
async fn submissions_append_and_list_newest_first() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "member@example.com").await.unwrap();
    let token = token_for(&resources, &user);

    let (status, first) = post_json(
        &router,
        "/api/missions/core_belief/submissions",
        Some(&token),
        json!({ "answers": { "belief": "I must never fail", "situation": "exam week" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);

    let (status, second) = post_json(
        &router,
        "/api/missions/core_belief/submissions",
        Some(&token),
        json!({ "answers": { "belief": "Asking for help is weakness" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(second["submission_id"], first["submission_id"]);

    let (status, list) = get_json(
        &router,
        "/api/missions/core_belief/submissions",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 2);
    // Newest first
    assert_eq!(
        list["submissions"][0]["submission_id"],
        second["submission_id"]
    );
    assert_eq!(
        list["submissions"][1]["answers"]["belief"],
        "I must never fail"
    );
}

#[tokio::test]
async fn missions_are_isolated_per_user_and_kind() {
    let (router, resources) = create_test_app().await.unwrap();
    let first = create_test_user(&resources, "first@example.com").await.unwrap();
    let second = create_test_user(&resources, "second@example.com").await.unwrap();
    let first_token = token_for(&resources, &first);
    let second_token = token_for(&resources, &second);

    post_json(
        &router,
        "/api/missions/core_belief/submissions",
        Some(&first_token),
        json!({ "answers": { "belief": "mine" } }),
    )
    .await;

    let (_, list) = get_json(
        &router,
        "/api/missions/core_belief/submissions",
        Some(&second_token),
    )
    .await;
    assert_eq!(list["total"], 0);

    let (_, list) = get_json(
        &router,
        "/api/missions/cognitive_error/submissions",
        Some(&first_token),
    )
    .await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn unknown_mission_is_rejected() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "member@example.com").await.unwrap();
    let token = token_for(&resources, &user);

    let (status, body) = post_json(
        &router,
        "/api/missions/gratitude_journal/submissions",
        Some(&token),
        json!({ "answers": { "note": "?" } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn null_answers_are_rejected() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "member@example.com").await.unwrap();
    let token = token_for(&resources, &user);

    let (status, _) = post_json(
        &router,
        "/api/missions/cognitive_error/submissions",
        Some(&token),
        json!({ "answers": null }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submissions_require_authentication() {
    let (router, _resources) = create_test_app().await.unwrap();

    let (status, _) = post_json(
        &router,
        "/api/missions/core_belief/submissions",
        None,
        json!({ "answers": {} }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
