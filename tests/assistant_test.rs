// ABOUTME: Integration tests for the conversation client and agreement generator
// ABOUTME: Exercises retry budgets, timeouts, blank responses and fallbacks against a scripted provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;
use std::time::Duration;

use agreement_studio::assistant::{AgreementGenerator, Completion, ConversationClient, RetryPolicy};
use agreement_studio::llm::prompts::{fallback_agreement, FALLBACK_REPLIES};
use chrono::NaiveDate;
use common::init_test_logging;
use helpers::scripted_provider::{ScriptedProvider, Step};
use studio_core::errors::ErrorCode;
use studio_core::models::ConversationTurn;

fn quick_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        pause: Duration::ZERO,
        timeout: Duration::from_millis(100),
    }
}

fn history() -> Vec<ConversationTurn> {
    vec![
        ConversationTurn::user("We keep forgetting to call"),
        ConversationTurn::assistant("What would help?"),
        ConversationTurn::user("A weekly call between Ana and Ben"),
    ]
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

// ============================================================================
// Conversation Client
// ============================================================================

#[tokio::test]
async fn test_reply_uses_sampling_parameters_and_transcript() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::always("  What matters most?  "));
    let client = ConversationClient::new(provider.clone(), quick_policy(2));

    let reply = client.reply(&history()).await;
    assert_eq!(reply, Completion::Generated("What matters most?".to_owned()));

    let request = &provider.requests()[0];
    assert_eq!(request.max_tokens, Some(300));
    assert_eq!(request.temperature, Some(0.7));
    assert_eq!(request.top_p, Some(0.8));
    assert_eq!(request.top_k, Some(40));

    let prompt = provider.last_prompt();
    assert!(prompt.contains("User: We keep forgetting to call"));
    assert!(prompt.contains("Assistant: What would help?"));
    assert!(prompt.trim_end().ends_with("Assistant:"));
}

#[tokio::test]
async fn test_reply_retries_once_then_succeeds() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::new(vec![
        Step::Fail(ErrorCode::ExternalServiceError),
        Step::Reply("Second try".to_owned()),
    ]));
    let client = ConversationClient::new(provider.clone(), quick_policy(2));

    let reply = client.reply(&history()).await;
    assert_eq!(reply.text(), "Second try");
    assert!(!reply.is_fallback());
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_blank_and_hanging_responses_fall_back() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::new(vec![Step::Blank, Step::Hang]));
    let client = ConversationClient::new(provider.clone(), quick_policy(2));

    let reply = client.reply(&history()).await;
    assert!(reply.is_fallback());
    assert_eq!(reply.text(), FALLBACK_REPLIES[1]);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_retry_pause_is_honored() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::failing());
    let policy = RetryPolicy {
        max_attempts: 2,
        pause: Duration::from_millis(50),
        timeout: Duration::from_millis(100),
    };
    let client = ConversationClient::new(provider.clone(), policy);

    let started = std::time::Instant::now();
    let reply = client.reply(&history()).await;
    assert!(reply.is_fallback());
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(provider.call_count(), 2);
}

// ============================================================================
// Agreement Generator
// ============================================================================

#[tokio::test]
async fn test_generator_prompt_and_parameters() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::always("AGREEMENT\n\nBetween: Ana and Ben"));
    let generator = AgreementGenerator::new(provider.clone(), quick_policy(1));

    let document = generator
        .generate(&history(), "Friendship or Promise", "Ana and Ben", day())
        .await;
    assert_eq!(
        document,
        Completion::Generated("AGREEMENT\n\nBetween: Ana and Ben".to_owned())
    );

    let request = &provider.requests()[0];
    assert_eq!(request.max_tokens, Some(800));
    assert_eq!(request.temperature, Some(0.7));

    let prompt = provider.last_prompt();
    assert!(prompt.contains("October 16, 2026"));
    assert!(prompt.contains("Friendship or Promise"));
    assert!(prompt.contains("Ana and Ben"));
    assert!(prompt.contains("user: A weekly call between Ana and Ben"));
}

#[tokio::test]
async fn test_generator_does_not_retry_by_default() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::new(vec![
        Step::Fail(ErrorCode::ExternalRateLimited),
        Step::Reply("never reached".to_owned()),
    ]));
    let generator = AgreementGenerator::new(provider.clone(), RetryPolicy::generator_defaults());

    let document = generator
        .generate(&history(), "Living Together", "Sam and Alex", day())
        .await;

    assert!(document.is_fallback());
    assert_eq!(document.text(), fallback_agreement("Sam and Alex", day()));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_generator_timeout_falls_back() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::new(vec![Step::Hang]));
    let generator = AgreementGenerator::new(provider, quick_policy(1));

    let document = generator
        .generate(&[], "Personal Commitment", "Me", day())
        .await
        .into_text();

    assert!(document.contains("Between: Me"));
    assert!(document.contains("Date: October 16, 2026"));
    assert!(!document.contains('['));
}
