// ABOUTME: Integration tests for the agreement record store
// ABOUTME: Covers create, token lookup, save round trips, archive filtering and seeding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Utc;
use common::{agreement_type, create_test_database};
use studio_core::constants::DEFAULT_AGREEMENT_TYPES;
use studio_core::errors::ErrorCode;
use studio_core::models::{AgreementStatus, ConversationTurn};

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let database = create_test_database().await.unwrap();

    let types = database.agreement_types().list().await.unwrap();
    assert_eq!(types.len(), DEFAULT_AGREEMENT_TYPES.len());
    assert_eq!(types[0].name, "Love or Partnership");

    let created = database.agreement_types().seed_defaults().await.unwrap();
    assert_eq!(created, 0);
    assert_eq!(
        database.agreement_types().list().await.unwrap().len(),
        DEFAULT_AGREEMENT_TYPES.len()
    );
}

#[tokio::test]
async fn test_create_and_fetch_by_token() {
    let database = create_test_database().await.unwrap();
    let love = agreement_type(&database, "love-partnership").await.unwrap();
    let agreements = database.agreements();

    let created = agreements
        .create(love.id, "token-1", "Ana and Ben")
        .await
        .unwrap();
    assert_eq!(created.status, AgreementStatus::Draft);
    assert!(created.is_archived);

    let fetched = agreements.get_by_session_key("token-1").await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.participants, "Ana and Ben");
    assert!(fetched.conversation_history.is_empty());

    assert!(agreements.find_by_session_key("missing").await.unwrap().is_none());
    let err = agreements.get_by_session_key("missing").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_duplicate_session_key_is_rejected() {
    let database = create_test_database().await.unwrap();
    let love = agreement_type(&database, "love-partnership").await.unwrap();

    database.agreements().create(love.id, "dup", "").await.unwrap();
    let err = database
        .agreements()
        .create(love.id, "dup", "")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
}

#[tokio::test]
async fn test_save_round_trips_every_field() {
    let database = create_test_database().await.unwrap();
    let work = agreement_type(&database, "work-collaboration").await.unwrap();
    let agreements = database.agreements();

    let mut agreement = agreements.create(work.id, "token-save", "").await.unwrap();
    agreement.advance_to(AgreementStatus::Reflection).unwrap();
    agreement.push_turn(ConversationTurn::user("We build between us"));
    agreement.push_turn(ConversationTurn::assistant("What do you build?"));
    agreement.agreement_text = "Generated".to_owned();
    agreement.edited_text = "Edited".to_owned();
    agreement.advance_to(AgreementStatus::Signed).unwrap();
    assert!(agreement.mark_signed(Utc::now()));
    agreements.save(&agreement).await.unwrap();

    let stored = agreements.get_by_id(agreement.id).await.unwrap().unwrap();
    assert_eq!(stored.conversation_history, agreement.conversation_history);
    assert_eq!(stored.status, AgreementStatus::Signed);
    assert_eq!(stored.final_text(), "Edited");
    assert!(stored.signed_at.is_some());
    assert!(stored.completed_at.is_none());
}

#[tokio::test]
async fn test_save_missing_record_is_not_found() {
    let database = create_test_database().await.unwrap();
    let love = agreement_type(&database, "love-partnership").await.unwrap();
    let mut agreement = database
        .agreements()
        .create(love.id, "token-gone", "")
        .await
        .unwrap();
    agreement.id += 1000;

    let err = database.agreements().save(&agreement).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_archive_listing_filters_and_orders() {
    let database = create_test_database().await.unwrap();
    let love = agreement_type(&database, "love-partnership").await.unwrap();
    let agreements = database.agreements();
    let now = Utc::now();

    let mut ids = Vec::new();
    for key in ["a", "b", "c", "d"] {
        let mut agreement = agreements.create(love.id, key, key).await.unwrap();
        agreement.advance_to(AgreementStatus::Signed).unwrap();
        if key != "d" {
            agreement.mark_completed(now).unwrap();
        }
        agreements.save(&agreement).await.unwrap();
        ids.push(agreement.id);
    }
    agreements.set_archived(ids[1], false).await.unwrap();

    let listed: Vec<i64> = agreements
        .list_completed_archived()
        .await
        .unwrap()
        .iter()
        .map(|entry| entry.agreement.id)
        .collect();
    assert_eq!(listed, vec![ids[2], ids[0]]);
    assert_eq!(agreements.count_completed_archived().await.unwrap(), 2);

    let entry = agreements.get_archive_entry(ids[3]).await.unwrap().unwrap();
    assert_eq!(entry.agreement_type.slug, "love-partnership");
    assert!(entry.photo.is_none());
    assert!(agreements.get_archive_entry(9999).await.unwrap().is_none());

    let err = agreements.set_archived(9999, true).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
