// ABOUTME: Assistant layer wrapping the LLM provider with retry, timeout, and fallback
// ABOUTME: Exposes the conversation client and agreement generator used by the flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Assistant
//!
//! The two points where the flow calls out to a generative-text provider.
//! Both go through [`complete_with_retry`] and both answer with a
//! [`Completion`]: either the provider's text or a canned fallback. Provider
//! failures never escape this module.

mod conversation;
mod generator;

pub use conversation::ConversationClient;
pub use generator::AgreementGenerator;

use std::time::Duration;

use tracing::warn;

use crate::constants::generation;
use crate::errors::{AppError, ErrorCode};
use crate::llm::{ChatRequest, LlmProvider};

/// Outcome of an assistant call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Text produced by the provider
    Generated(String),
    /// Canned text used after the provider failed
    Fallback(String),
}

impl Completion {
    /// Whether this is canned text
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Borrow the text regardless of origin
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) | Self::Fallback(text) => text,
        }
    }

    /// Collapse to text regardless of origin
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) | Self::Fallback(text) => text,
        }
    }
}

/// Attempt budget for one assistant call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (treated as at least 1)
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub pause: Duration,
    /// Per-attempt timeout
    pub timeout: Duration,
}

impl RetryPolicy {
    /// Reflection reply budget: 2 attempts, 2 s apart, 30 s each
    #[must_use]
    pub const fn chat_defaults() -> Self {
        Self {
            max_attempts: generation::CHAT_MAX_ATTEMPTS,
            pause: Duration::from_secs(generation::CHAT_RETRY_PAUSE_SECS),
            timeout: Duration::from_secs(generation::CHAT_TIMEOUT_SECS),
        }
    }

    /// Agreement document budget: a single 60 s attempt
    #[must_use]
    pub const fn generator_defaults() -> Self {
        Self {
            max_attempts: generation::GENERATOR_MAX_ATTEMPTS,
            pause: Duration::ZERO,
            timeout: Duration::from_secs(generation::GENERATOR_TIMEOUT_SECS),
        }
    }

    /// Same budget without the pause between attempts
    #[must_use]
    pub const fn without_pause(self) -> Self {
        Self {
            pause: Duration::ZERO,
            ..self
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::chat_defaults()
    }
}

/// Run `request` against `provider` under `policy`
///
/// An error, a timeout, and a blank response all count as a failed attempt.
/// Returns the first non-blank content, trimmed.
///
/// # Errors
///
/// Returns the last attempt's error once every attempt has failed
pub async fn complete_with_retry(
    provider: &dyn LlmProvider,
    request: &ChatRequest,
    policy: RetryPolicy,
    component: &str,
) -> Result<String, AppError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = AppError::new(
        ErrorCode::ExternalServiceError,
        format!("{component}: no attempt made"),
    );

    for attempt in 1..=max_attempts {
        let outcome = tokio::time::timeout(policy.timeout, provider.complete(request)).await;

        last_error = match outcome {
            Ok(Ok(response)) if !response.content.trim().is_empty() => {
                return Ok(response.content.trim().to_owned());
            }
            Ok(Ok(_)) => AppError::external_service(provider.display_name(), "Empty response"),
            Ok(Err(error)) => error,
            Err(_) => AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!(
                    "{} timed out after {}s",
                    provider.display_name(),
                    policy.timeout.as_secs()
                ),
            ),
        };

        warn!(
            assistant.component = %component,
            provider = provider.name(),
            attempt,
            max_attempts,
            error = %last_error,
            "Assistant attempt failed"
        );

        if attempt < max_attempts && !policy.pause.is_zero() {
            tokio::time::sleep(policy.pause).await;
        }
    }

    Err(last_error)
}
