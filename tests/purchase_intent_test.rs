// ABOUTME: Integration tests for payment-intent creation, purchase decisions, and the gateway stub
// ABOUTME: Covers duplicate-intent suppression, ownership checks, and coach-only transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use innerlens_server::models::PurchaseStatus;

use common::{
    create_test_app, create_test_user, get_json, post_json, seed_assessment, token_for,
    COACH_EMAIL,
};

fn intent_body(assessment_result_id: &str) -> serde_json::Value {
    json!({
        "assessment_result_id": assessment_result_id,
        "program": "coaching",
        "amount": 90_000,
        "depositor_name": "HONG GILDONG",
    })
}

#[tokio::test]
async fn repeated_checkout_returns_the_same_intent() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "buyer@example.com").await.unwrap();
    let token = token_for(&resources, &user);
    let assessment = seed_assessment(&resources, user.id).await.unwrap();

    let (status, first) = post_json(
        &router,
        "/api/purchases",
        Some(&token),
        intent_body(&assessment.id.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["created"], true);
    assert!(first["order_code"].as_str().is_some_and(|c| c.len() > 14));

    let (status, second) = post_json(
        &router,
        "/api/purchases",
        Some(&token),
        intent_body(&assessment.id.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);
    assert_eq!(second["purchase_id"], first["purchase_id"]);

    // Exactly one pending row exists
    let pending = resources
        .database
        .list_purchases_by_status(PurchaseStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn checkout_includes_manual_transfer_details_without_gateway() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "buyer@example.com").await.unwrap();
    let token = token_for(&resources, &user);
    let assessment = seed_assessment(&resources, user.id).await.unwrap();

    let (_, body) = post_json(
        &router,
        "/api/purchases",
        Some(&token),
        intent_body(&assessment.id.to_string()),
    )
    .await;

    assert_eq!(body["bank_transfer"]["bank_name"], "Test Bank");
    assert_eq!(body["bank_transfer"]["account_number"], "123-456-789");
}

#[tokio::test]
async fn checkout_validates_input() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "buyer@example.com").await.unwrap();
    let token = token_for(&resources, &user);
    let assessment = seed_assessment(&resources, user.id).await.unwrap();
    let result_id = assessment.id.to_string();

    let mut missing_name = intent_body(&result_id);
    missing_name["depositor_name"] = json!("   ");
    let (status, _) = post_json(&router, "/api/purchases", Some(&token), missing_name).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut zero_amount = intent_body(&result_id);
    zero_amount["amount"] = json!(0);
    let (status, _) = post_json(&router, "/api/purchases", Some(&token), zero_amount).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_program = intent_body(&result_id);
    bad_program["program"] = json!("premium");
    let (status, _) = post_json(&router, "/api/purchases", Some(&token), bad_program).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&router, "/api/purchases", None, intent_body(&result_id)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn checkout_rejects_results_the_caller_does_not_own() {
    let (router, resources) = create_test_app().await.unwrap();
    let owner = create_test_user(&resources, "owner@example.com").await.unwrap();
    let intruder = create_test_user(&resources, "intruder@example.com")
        .await
        .unwrap();
    let assessment = seed_assessment(&resources, owner.id).await.unwrap();

    let token = token_for(&resources, &intruder);
    let (status, body) = post_json(
        &router,
        "/api/purchases",
        Some(&token),
        intent_body(&assessment.id.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "resource_not_found");

    // Unknown result id behaves the same
    let token = token_for(&resources, &owner);
    let (status, _) = post_json(
        &router,
        "/api/purchases",
        Some(&token),
        intent_body(&Uuid::new_v4().to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn coach_confirms_a_pending_purchase_once() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "buyer@example.com").await.unwrap();
    let coach = create_test_user(&resources, COACH_EMAIL).await.unwrap();
    let user_token = token_for(&resources, &user);
    let coach_token = token_for(&resources, &coach);

    let assessment = seed_assessment(&resources, user.id).await.unwrap();
    let (_, created) = post_json(
        &router,
        "/api/purchases",
        Some(&user_token),
        intent_body(&assessment.id.to_string()),
    )
    .await;
    let purchase_id = created["purchase_id"].as_str().unwrap().to_owned();
    let uri = format!("/api/purchases/{purchase_id}/decision");

    // Non-coach is refused
    let (status, _) = post_json(&router, &uri, Some(&user_token), json!({ "action": "confirm" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Coach confirms; the start date is stamped with the confirmation date
    let (status, body) =
        post_json(&router, &uri, Some(&coach_token), json!({ "action": "confirm" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "confirm");

    let purchase = resources
        .database
        .get_purchase(Uuid::parse_str(&purchase_id).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(purchase.status, PurchaseStatus::Confirmed);
    assert_eq!(purchase.confirmed_by.as_deref(), Some(COACH_EMAIL));
    assert_eq!(purchase.program_starts_on, Some(Utc::now().date_naive()));

    // Purchases are mutated exactly once
    let (status, _) =
        post_json(&router, &uri, Some(&coach_token), json!({ "action": "confirm" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) =
        post_json(&router, &uri, Some(&coach_token), json!({ "action": "reject" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejected_intent_does_not_block_a_new_checkout() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "buyer@example.com").await.unwrap();
    let coach = create_test_user(&resources, COACH_EMAIL).await.unwrap();
    let user_token = token_for(&resources, &user);
    let coach_token = token_for(&resources, &coach);
    let assessment = seed_assessment(&resources, user.id).await.unwrap();

    let (_, first) = post_json(
        &router,
        "/api/purchases",
        Some(&user_token),
        intent_body(&assessment.id.to_string()),
    )
    .await;
    let first_id = first["purchase_id"].as_str().unwrap().to_owned();

    let (status, _) = post_json(
        &router,
        &format!("/api/purchases/{first_id}/decision"),
        Some(&coach_token),
        json!({ "action": "reject" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = post_json(
        &router,
        "/api/purchases",
        Some(&user_token),
        intent_body(&assessment.id.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], true);
    assert_ne!(second["purchase_id"], first["purchase_id"]);
}

#[tokio::test]
async fn coach_review_queue_is_role_gated_and_filterable() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "buyer@example.com").await.unwrap();
    let coach = create_test_user(&resources, COACH_EMAIL).await.unwrap();
    let user_token = token_for(&resources, &user);
    let coach_token = token_for(&resources, &coach);

    let assessment = seed_assessment(&resources, user.id).await.unwrap();
    post_json(
        &router,
        "/api/purchases",
        Some(&user_token),
        intent_body(&assessment.id.to_string()),
    )
    .await;

    let (status, _) = get_json(&router, "/api/coach/purchases", Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = get_json(&router, "/api/coach/purchases", Some(&coach_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["purchases"][0]["status"], "pending");

    let (status, _) = get_json(
        &router,
        "/api/coach/purchases?status=paid",
        Some(&coach_token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gateway_endpoints_answer_service_unavailable() {
    let (router, resources) = create_test_app().await.unwrap();
    let user = create_test_user(&resources, "buyer@example.com").await.unwrap();
    let token = token_for(&resources, &user);

    for uri in ["/api/payments/gateway/approve", "/api/payments/gateway/cancel"] {
        let (status, body) = post_json(&router, uri, Some(&token), json!({})).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "feature_disabled");
    }
}
