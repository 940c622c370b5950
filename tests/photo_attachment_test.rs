// ABOUTME: Integration tests for signing photo attachment
// ABOUTME: Covers the single-photo transaction that also completes the agreement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Utc;
use common::{agreement_type, create_test_database};
use studio_core::errors::ErrorCode;
use studio_core::models::AgreementStatus;

#[tokio::test]
async fn test_attach_is_single_and_atomic() {
    let database = create_test_database().await.unwrap();
    let love = agreement_type(&database, "love-partnership").await.unwrap();
    let now = Utc::now();

    let mut agreement = database
        .agreements()
        .create(love.id, "photo-token", "A and B")
        .await
        .unwrap();
    agreement.advance_to(AgreementStatus::Signed).unwrap();
    database.agreements().save(&agreement).await.unwrap();

    let mut completed = agreement.clone();
    completed.mark_completed(now).unwrap();
    let photo = database
        .photos()
        .attach_and_complete(&completed, "signing_photos/a.png", Some("image/png"))
        .await
        .unwrap();
    assert_eq!(photo.agreement_id, agreement.id);

    let stored = database.agreements().get_by_id(agreement.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AgreementStatus::Completed);
    assert!(stored.completed_at.is_some());

    let mut edited = completed.clone();
    edited.edited_text = "should not be written".to_owned();
    let err = database
        .photos()
        .attach_and_complete(&edited, "signing_photos/b.png", None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);

    let stored = database.agreements().get_by_id(agreement.id).await.unwrap().unwrap();
    assert!(stored.edited_text.is_empty());
    let kept = database
        .photos()
        .get_for_agreement(agreement.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.image_path, "signing_photos/a.png");
}
