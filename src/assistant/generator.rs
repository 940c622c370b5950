// ABOUTME: Agreement document generator run once when reflection ends
// ABOUTME: Builds the dated generation prompt and falls back to a complete template on failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use std::sync::Arc;

use chrono::NaiveDate;
use studio_core::models::ConversationTurn;
use tracing::instrument;

use super::{complete_with_retry, Completion, RetryPolicy};
use crate::constants::generation;
use crate::llm::prompts::{fallback_agreement, render_agreement_prompt};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::logging::AppLogger;

/// Writes the agreement document from the reflection dialogue
#[derive(Clone)]
pub struct AgreementGenerator {
    provider: Arc<dyn LlmProvider>,
    policy: RetryPolicy,
}

impl AgreementGenerator {
    /// Create a generator over `provider` with the given attempt budget
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Generate the agreement text dated `today`
    #[instrument(skip(self, history, participants), fields(turns = history.len(), agreement_type = %agreement_type))]
    pub async fn generate(
        &self,
        history: &[ConversationTurn],
        agreement_type: &str,
        participants: &str,
        today: NaiveDate,
    ) -> Completion {
        let prompt = render_agreement_prompt(history, agreement_type, participants, today);
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(generation::TEMPERATURE)
            .with_top_p(generation::TOP_P)
            .with_top_k(generation::TOP_K)
            .with_max_tokens(generation::GENERATOR_MAX_TOKENS);

        match complete_with_retry(self.provider.as_ref(), &request, self.policy, "generator").await
        {
            Ok(text) => Completion::Generated(text),
            Err(error) => {
                AppLogger::log_fallback("generator", &error.to_string());
                Completion::Fallback(fallback_agreement(participants, today))
            }
        }
    }
}
