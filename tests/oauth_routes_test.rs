// ABOUTME: Integration tests for the YouTube linking redirect flow
// ABOUTME: Verifies authorization redirects and error-reason redirects without a live provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use innerlens_server::server::build_router;

use common::{create_test_resources_with, test_config, test_config_with_oauth};

async fn redirect_location(router: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    (status, location)
}

#[tokio::test]
async fn initiation_redirects_to_the_provider_with_the_youtube_scope() {
    let resources = create_test_resources_with(test_config_with_oauth())
        .await
        .unwrap();
    let router = build_router(resources);

    let (status, location) = redirect_location(&router, "/auth/youtube").await;

    assert!(status.is_redirection());
    assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
    assert!(location.contains("client_id=test-client-id"));
    assert!(location.contains("youtube.readonly"));
    assert!(location.contains("access_type=offline"));
    assert!(location.contains("state="));
}

#[tokio::test]
async fn initiation_without_credentials_redirects_to_onboarding() {
    let resources = create_test_resources_with(test_config()).await.unwrap();
    let router = build_router(resources);

    let (status, location) = redirect_location(&router, "/auth/youtube").await;

    assert!(status.is_redirection());
    assert_eq!(
        location,
        "http://localhost:8081/onboarding?error=oauth_not_configured"
    );
}

#[tokio::test]
async fn callback_without_code_reports_no_code() {
    let resources = create_test_resources_with(test_config_with_oauth())
        .await
        .unwrap();
    let router = build_router(resources);

    let (status, location) = redirect_location(&router, "/auth/youtube/callback").await;

    assert!(status.is_redirection());
    assert_eq!(location, "http://localhost:8081/onboarding?error=no_code");
}

#[tokio::test]
async fn callback_with_provider_error_reports_access_denied() {
    let resources = create_test_resources_with(test_config_with_oauth())
        .await
        .unwrap();
    let router = build_router(resources);

    let (status, location) =
        redirect_location(&router, "/auth/youtube/callback?error=access_denied").await;

    assert!(status.is_redirection());
    assert_eq!(
        location,
        "http://localhost:8081/onboarding?error=access_denied"
    );
}

#[tokio::test]
async fn callback_with_empty_code_reports_no_code() {
    let resources = create_test_resources_with(test_config_with_oauth())
        .await
        .unwrap();
    let router = build_router(resources);

    let (status, location) = redirect_location(&router, "/auth/youtube/callback?code=").await;

    assert!(status.is_redirection());
    assert_eq!(location, "http://localhost:8081/onboarding?error=no_code");
}
