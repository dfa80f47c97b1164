// ABOUTME: Unit tests for the database layer run against in-memory SQLite
// ABOUTME: Covers slot deduplication, open-slot listing, and live-booking uniqueness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use chrono::{Duration, Utc};

use innerlens_server::{
    errors::ErrorCode,
    models::{ProgramKind, User},
};

use common::{create_test_resources, seed_assessment, seed_purchase};

#[tokio::test]
async fn publishing_the_same_slot_twice_inserts_once() {
    let resources = create_test_resources().await.unwrap();
    let starts_at = Utc::now() + Duration::days(2);

    let created = resources.database.create_slots(&[starts_at]).await.unwrap();
    assert_eq!(created, 1);

    let created = resources.database.create_slots(&[starts_at]).await.unwrap();
    assert_eq!(created, 0);

    let open = resources.database.list_open_slots(Utc::now()).await.unwrap();
    assert_eq!(open.len(), 1);
}

#[tokio::test]
async fn open_slot_listing_excludes_past_times() {
    let resources = create_test_resources().await.unwrap();
    let past = Utc::now() - Duration::days(1);
    let future = Utc::now() + Duration::days(1);

    resources
        .database
        .create_slots(&[past, future])
        .await
        .unwrap();

    let open = resources.database.list_open_slots(Utc::now()).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].starts_at.timestamp(), future.timestamp());
}

#[tokio::test]
async fn a_purchase_cannot_hold_two_live_bookings() {
    let resources = create_test_resources().await.unwrap();
    let user = User::new(
        "member@example.com".to_owned(),
        "hash".to_owned(),
        None,
    );
    resources.database.create_user(&user).await.unwrap();
    let assessment = seed_assessment(&resources, user.id).await.unwrap();
    let purchase = seed_purchase(&resources, user.id, assessment.id, ProgramKind::Coaching)
        .await
        .unwrap();

    let proposed = vec![(Utc::now() + Duration::days(3)).to_rfc3339()];
    resources
        .database
        .create_booking(purchase.id, &proposed)
        .await
        .unwrap();

    let err = resources
        .database
        .create_booking(purchase.id, &proposed)
        .await
        .err();
    assert!(err.is_some_and(|e| e.code == ErrorCode::InvalidInput));
}

#[tokio::test]
async fn a_rejected_booking_frees_the_purchase_for_a_new_request() {
    let resources = create_test_resources().await.unwrap();
    let user = User::new(
        "member@example.com".to_owned(),
        "hash".to_owned(),
        None,
    );
    resources.database.create_user(&user).await.unwrap();
    let assessment = seed_assessment(&resources, user.id).await.unwrap();
    let purchase = seed_purchase(&resources, user.id, assessment.id, ProgramKind::Coaching)
        .await
        .unwrap();

    let proposed = vec![(Utc::now() + Duration::days(3)).to_rfc3339()];
    let booking = resources
        .database
        .create_booking(purchase.id, &proposed)
        .await
        .unwrap();
    resources.database.reject_booking(booking.id).await.unwrap();

    // The rejected booking no longer blocks a fresh request
    let second = resources
        .database
        .create_booking(purchase.id, &proposed)
        .await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn proposed_slots_round_trip_through_storage() {
    let resources = create_test_resources().await.unwrap();
    let user = User::new(
        "member@example.com".to_owned(),
        "hash".to_owned(),
        None,
    );
    resources.database.create_user(&user).await.unwrap();
    let assessment = seed_assessment(&resources, user.id).await.unwrap();
    let purchase = seed_purchase(&resources, user.id, assessment.id, ProgramKind::Coaching)
        .await
        .unwrap();

    let proposed = vec![
        "2026-09-01T10:00:00+00:00".to_owned(),
        "2026-09-02T14:00:00+00:00".to_owned(),
    ];
    let booking = resources
        .database
        .create_booking(purchase.id, &proposed)
        .await
        .unwrap();

    let loaded = resources
        .database
        .get_booking(booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.proposed_slots, proposed);
}
