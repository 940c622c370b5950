// ABOUTME: Reflection dialogue client producing the assistant's next turn
// ABOUTME: Renders the persona-prefixed transcript and falls back to canned replies on failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use std::sync::Arc;

use studio_core::models::ConversationTurn;
use tracing::instrument;

use super::{complete_with_retry, Completion, RetryPolicy};
use crate::constants::generation;
use crate::llm::prompts::{fallback_reply, render_reflection_prompt};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::logging::AppLogger;

/// Produces the assistant's reply during reflection
#[derive(Clone)]
pub struct ConversationClient {
    provider: Arc<dyn LlmProvider>,
    policy: RetryPolicy,
}

impl ConversationClient {
    /// Create a client over `provider` with the given attempt budget
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Attempt budget in use
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Reply to the dialogue so far
    ///
    /// `history` already ends with the participant's newest turn. On failure
    /// the reply is the canned line for `history.len()`.
    #[instrument(skip(self, history), fields(turns = history.len(), provider = self.provider.name()))]
    pub async fn reply(&self, history: &[ConversationTurn]) -> Completion {
        let request = ChatRequest::new(vec![ChatMessage::user(render_reflection_prompt(history))])
            .with_temperature(generation::TEMPERATURE)
            .with_top_p(generation::TOP_P)
            .with_top_k(generation::TOP_K)
            .with_max_tokens(generation::CHAT_MAX_TOKENS);

        match complete_with_retry(self.provider.as_ref(), &request, self.policy, "conversation")
            .await
        {
            Ok(text) => Completion::Generated(text),
            Err(error) => {
                AppLogger::log_fallback("conversation", &error.to_string());
                Completion::Fallback(fallback_reply(history.len()).to_owned())
            }
        }
    }
}
