// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database, resource, user, and request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

//! Shared test utilities for `innerlens_server`

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use innerlens_server::{
    config::environment::{BankTransferDetails, GoogleOAuthConfig, ServerConfig},
    database::Database,
    models::{AssessmentResult, ProgramKind, Purchase, User},
    resources::ServerResources,
    server::build_router,
};

pub const COACH_EMAIL: &str = "coach@innerlens.app";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Base configuration for tests: in-memory database, one coach, no
/// optional integrations.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        base_url: "http://localhost:8081".to_owned(),
        http_port: 0,
        database_url: "sqlite::memory:".to_owned(),
        jwt_secret: "integration-test-secret-0123456789".to_owned(),
        google_oauth: None,
        ai: None,
        gateway: None,
        bank_transfer: BankTransferDetails {
            account_holder: "Innerlens Inc.".to_owned(),
            bank_name: "Test Bank".to_owned(),
            account_number: "123-456-789".to_owned(),
        },
        coach_emails: vec![COACH_EMAIL.to_owned()],
    }
}

/// Configuration with Google OAuth credentials present
pub fn test_config_with_oauth() -> ServerConfig {
    let mut config = test_config();
    config.google_oauth = Some(GoogleOAuthConfig {
        client_id: "test-client-id".to_owned(),
        client_secret: "test-client-secret".to_owned(),
    });
    config
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    Ok(Database::new("sqlite::memory:").await?)
}

/// Resources over an in-memory database with the given configuration
pub async fn create_test_resources_with(config: ServerConfig) -> Result<Arc<ServerResources>> {
    let database = Database::new(&config.database_url).await?;
    Ok(Arc::new(ServerResources::new(config, database)))
}

/// Default resources: in-memory database, one coach, nothing optional
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    create_test_resources_with(test_config()).await
}

/// Create and persist a user; low bcrypt cost keeps tests fast
pub async fn create_test_user(resources: &Arc<ServerResources>, email: &str) -> Result<User> {
    let password_hash = bcrypt::hash(TEST_PASSWORD, 4)?;
    let user = User::new(email.to_owned(), password_hash, None);
    resources.database.create_user(&user).await?;
    Ok(user)
}

/// Session token for a user
pub fn token_for(resources: &Arc<ServerResources>, user: &User) -> String {
    resources
        .auth
        .generate_token(user.id, &user.email)
        .expect("token generation")
}

/// Seed an assessment result owned by the user
pub async fn seed_assessment(
    resources: &Arc<ServerResources>,
    user_id: Uuid,
) -> Result<AssessmentResult> {
    let report = serde_json::json!({
        "summary": "Curious systems thinker",
        "traits": [{ "name": "curiosity", "evidence": "science channels" }],
    });
    Ok(resources
        .database
        .create_assessment_result(user_id, "Curious systems thinker", &report, "test-model")
        .await?)
}

/// Seed a pending purchase for an assessment result
pub async fn seed_purchase(
    resources: &Arc<ServerResources>,
    user_id: Uuid,
    assessment_result_id: Uuid,
    program: ProgramKind,
) -> Result<Purchase> {
    let outcome = resources
        .database
        .create_purchase_intent(
            user_id,
            assessment_result_id,
            program,
            90_000,
            "bank_transfer",
            "HONG GILDONG",
        )
        .await?;
    Ok(outcome.purchase)
}

// ============================================================================
// Request helpers
// ============================================================================

/// Send a JSON request and return status plus parsed body
pub async fn request_json(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build"),
        None => builder.body(Body::empty()).expect("request build"),
    };

    let response = router.clone().oneshot(request).await.expect("request send");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn post_json(
    router: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    request_json(router, "POST", uri, token, Some(body)).await
}

pub async fn get_json(router: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    request_json(router, "GET", uri, token, None).await
}

/// Router over fresh default resources, returning the resources too
pub async fn create_test_app() -> Result<(Router, Arc<ServerResources>)> {
    let resources = create_test_resources().await?;
    Ok((build_router(resources.clone()), resources))
}
