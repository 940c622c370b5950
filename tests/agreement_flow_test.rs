// ABOUTME: Integration tests for the agreement session state machine
// ABOUTME: Checks step guards, set-once fields, participant fill-in and forward-only status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use agreement_studio::flow::{CompleteOutcome, PhotoOutcome, SessionToken};
use agreement_studio::llm::prompts::{format_date, FALLBACK_REPLIES};
use agreement_studio::photos::PhotoPayload;
use chrono::NaiveDate;
use common::{create_test_studio, start_session, TestStudio, PNG_DATA_URL};
use helpers::scripted_provider::{ScriptedProvider, Step};
use studio_core::errors::ErrorCode;
use studio_core::models::{AgreementStatus, TurnRole};

async fn studio_with(provider: ScriptedProvider) -> (TestStudio, Arc<ScriptedProvider>) {
    let provider = Arc::new(provider);
    let studio = create_test_studio(provider.clone()).await.unwrap();
    (studio, provider)
}

async fn status(studio: &TestStudio, token: &SessionToken) -> AgreementStatus {
    studio.flow().resolve(token).await.unwrap().status
}

#[tokio::test]
async fn test_select_type_starts_in_reflection() {
    let (studio, _) = studio_with(ScriptedProvider::always("hi")).await;

    let (token, agreement) = start_session(&studio, "love-partnership", Some("  Ana and Ben "))
        .await
        .unwrap();
    assert_eq!(agreement.status, AgreementStatus::Reflection);
    assert_eq!(agreement.participants, "Ana and Ben");
    assert_eq!(status(&studio, &token).await, AgreementStatus::Reflection);

    let err = studio.flow().select_type(424_242, None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_unknown_token_is_session_missing() {
    let (studio, _) = studio_with(ScriptedProvider::always("hi")).await;
    let err = studio
        .flow()
        .reflection(&SessionToken::generate())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionMissing);
}

#[tokio::test]
async fn test_chat_appends_user_then_assistant() {
    let (studio, _) = studio_with(ScriptedProvider::always("Tell me more")).await;
    let (token, _) = start_session(&studio, "friendship-promise", None).await.unwrap();

    for expected in [2, 4, 6] {
        let reply = studio.flow().chat(&token, "Something true").await.unwrap();
        assert_eq!(reply.message_count, expected);
        assert_eq!(reply.response, "Tell me more");
    }

    let view = studio.flow().reflection(&token).await.unwrap();
    let roles: Vec<TurnRole> = view.conversation_history.iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        [TurnRole::User, TurnRole::Assistant].repeat(3),
        "turns alternate user/assistant"
    );

    let err = studio.flow().chat(&token, "   ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_chat_fallback_follows_history_length() {
    let (studio, provider) = studio_with(ScriptedProvider::failing()).await;
    let (token, _) = start_session(&studio, "living-together", None).await.unwrap();

    let expected_indices = [0, 1, 2, 3, 4, 5, 5];
    for index in expected_indices {
        let reply = studio.flow().chat(&token, "hello").await.unwrap();
        assert_eq!(reply.response, FALLBACK_REPLIES[index]);
    }
    assert_eq!(provider.call_count(), expected_indices.len() * 2);
}

#[tokio::test]
async fn test_generate_runs_once_and_fills_participants() {
    let (studio, provider) = studio_with(ScriptedProvider::new(vec![
        Step::Reply("Who is this between?".to_owned()),
        Step::Reply("AGREEMENT\nBetween: Ana and Ben".to_owned()),
    ]))
    .await;
    let (token, _) = start_session(&studio, "love-partnership", None).await.unwrap();

    studio
        .flow()
        .chat(&token, "This is between Ana and Ben")
        .await
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    let generated = studio.flow().generate_on(&token, today).await.unwrap();
    assert_eq!(generated.status, AgreementStatus::Review);
    assert_eq!(generated.participants, "This is between Ana and Ben");
    assert_eq!(generated.agreement_text, "AGREEMENT\nBetween: Ana and Ben");

    let prompt = provider.last_prompt();
    assert!(prompt.contains("October 16, 2026"));
    assert!(prompt.contains("Love or Partnership"));

    let again = studio.flow().generate_on(&token, today).await.unwrap();
    assert_eq!(again.agreement_text, generated.agreement_text);
    assert_eq!(provider.call_count(), 2, "generation is not repeated");
}

#[tokio::test]
async fn test_generate_without_between_uses_default_participants() {
    let (studio, _) = studio_with(ScriptedProvider::failing()).await;
    let (token, _) = start_session(&studio, "personal-commitment", None).await.unwrap();
    studio.flow().chat(&token, "I want to sleep more").await.unwrap();

    let today = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
    let agreement = studio.flow().generate_on(&token, today).await.unwrap();

    assert_eq!(agreement.participants, "Participants");
    assert!(agreement.agreement_text.contains("Participants"));
    assert!(agreement.agreement_text.contains(&format_date(today)));
    assert!(!agreement.agreement_text.contains('['));
}

#[tokio::test]
async fn test_review_and_print_guards() {
    let (studio, _) = studio_with(ScriptedProvider::always("Text")).await;
    let (token, _) = start_session(&studio, "work-collaboration", Some("Team"))
        .await
        .unwrap();

    let err = studio.flow().submit_review(&token, "early").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
    let err = studio.flow().confirm_print(&token).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    studio.flow().generate(&token).await.unwrap();
    let signed = studio
        .flow()
        .submit_review(&token, "  Verbatim text  ")
        .await
        .unwrap();
    assert_eq!(signed.status, AgreementStatus::Signed);
    assert_eq!(signed.edited_text, "  Verbatim text  ");

    let first = studio.flow().confirm_print(&token).await.unwrap();
    let second = studio.flow().confirm_print(&token).await.unwrap();
    assert!(first.signed_at.is_some());
    assert_eq!(first.signed_at, second.signed_at, "signed_at is set once");

    let resubmitted = studio.flow().submit_review(&token, "").await.unwrap();
    assert_eq!(resubmitted.status, AgreementStatus::Signed);
    assert_eq!(resubmitted.final_text(), "Text");
}

#[tokio::test]
async fn test_generate_after_review_keeps_status() {
    let (studio, _) = studio_with(ScriptedProvider::always("Text")).await;
    let (token, _) = start_session(&studio, "love-partnership", Some("A and B"))
        .await
        .unwrap();
    studio.flow().generate(&token).await.unwrap();
    studio.flow().submit_review(&token, "Edited").await.unwrap();

    let agreement = studio.flow().generate(&token).await.unwrap();
    assert_eq!(agreement.status, AgreementStatus::Signed);
    assert_eq!(agreement.final_text(), "Edited");
}

#[tokio::test]
async fn test_photo_completes_and_rejects_repeats() {
    let (studio, _) = studio_with(ScriptedProvider::always("Text")).await;
    let (token, _) = start_session(&studio, "love-partnership", Some("A and B"))
        .await
        .unwrap();

    let early = studio
        .flow()
        .submit_photo(&token, Some(PhotoPayload::DataUrl(PNG_DATA_URL.to_owned())))
        .await
        .unwrap_err();
    assert_eq!(early.code, ErrorCode::InvalidTransition);

    studio.flow().generate(&token).await.unwrap();
    studio.flow().submit_review(&token, "Final").await.unwrap();
    studio.flow().confirm_print(&token).await.unwrap();

    match studio.flow().submit_photo(&token, None).await.unwrap() {
        PhotoOutcome::Rejected(view) => assert!(view.error.is_some()),
        PhotoOutcome::Completed(_) => panic!("missing payload must not complete"),
    }
    assert_eq!(status(&studio, &token).await, AgreementStatus::Signed);

    match studio
        .flow()
        .submit_photo(&token, Some(PhotoPayload::DataUrl(PNG_DATA_URL.to_owned())))
        .await
        .unwrap()
    {
        PhotoOutcome::Completed(agreement) => {
            assert_eq!(agreement.status, AgreementStatus::Completed);
            assert!(agreement.completed_at.is_some());
        }
        PhotoOutcome::Rejected(view) => panic!("unexpected rejection: {:?}", view.error),
    }

    let repeat = studio
        .flow()
        .submit_photo(&token, Some(PhotoPayload::DataUrl(PNG_DATA_URL.to_owned())))
        .await
        .unwrap_err();
    assert_eq!(repeat.code, ErrorCode::ResourceAlreadyExists);

    let err = studio.flow().submit_review(&token, "late").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    match studio.flow().complete(&token).await.unwrap() {
        CompleteOutcome::Finished(view) => assert_eq!(view.agreement_text, "Final"),
        CompleteOutcome::Resume(path) => panic!("unexpected resume at {path}"),
    }
}

#[tokio::test]
async fn test_complete_resumes_at_current_step() {
    let (studio, _) = studio_with(ScriptedProvider::always("Text")).await;
    let (token, _) = start_session(&studio, "love-partnership", None).await.unwrap();

    let expect_resume = |outcome: CompleteOutcome| match outcome {
        CompleteOutcome::Resume(path) => path,
        CompleteOutcome::Finished(_) => panic!("not finished yet"),
    };

    assert_eq!(
        expect_resume(studio.flow().complete(&token).await.unwrap()),
        "/reflection/"
    );
    studio.flow().generate(&token).await.unwrap();
    assert_eq!(
        expect_resume(studio.flow().complete(&token).await.unwrap()),
        "/review/"
    );
    studio.flow().submit_review(&token, "x").await.unwrap();
    assert_eq!(
        expect_resume(studio.flow().complete(&token).await.unwrap()),
        "/print/"
    );
    studio.flow().confirm_print(&token).await.unwrap();
    assert_eq!(
        expect_resume(studio.flow().complete(&token).await.unwrap()),
        "/photo/"
    );
}
