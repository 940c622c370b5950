// ABOUTME: Prompts and canned fallback text for the reflection dialogue and agreement generator
// ABOUTME: Persona preamble is loaded at compile time; document prompts are rendered per call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Prompts
//!
//! Everything the assistant says or asks the model to say lives here: the
//! reflection persona, the generation instructions, and the fallback text used
//! when the provider cannot answer. The persona is loaded at compile time from
//! a markdown file for easy editing.

use chrono::NaiveDate;
use studio_core::models::{ConversationTurn, TurnRole};

/// Reflection companion persona, prepended to every dialogue prompt
pub const REFLECTION_PERSONA: &str = include_str!("reflection_persona.md");

/// Date format used in prompts and documents ("October 16, 2026")
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// Canned reflection replies, gentlest first
pub const FALLBACK_REPLIES: [&str; 6] = [
    "I hear you. That's an important foundation. What specific commitments or understandings do you both want to make clear?",
    "Thank you for sharing that. What does this mean for how you'll move forward together?",
    "That's meaningful. What do you each need from one another to honor this?",
    "I'm listening. What will make this agreement feel fair and peaceful to you both?",
    "This is taking shape. What else needs to be included to make this feel complete?",
    "I understand. How do you want to express that commitment in this agreement?",
];

/// Canned reply for a dialogue of `turns` entries
///
/// Index is `min(turns / 2, len - 1)`, so later fallbacks assume more context.
#[must_use]
pub fn fallback_reply(turns: usize) -> &'static str {
    FALLBACK_REPLIES[(turns / 2).min(FALLBACK_REPLIES.len() - 1)]
}

/// Format a date the way agreements print it
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Render the single-prompt reflection context
///
/// Persona, a blank line, then one `User:`/`Assistant:` line per turn, ending
/// with an open `Assistant:` cue.
#[must_use]
pub fn render_reflection_prompt(history: &[ConversationTurn]) -> String {
    let mut prompt = String::with_capacity(REFLECTION_PERSONA.len() + history.len() * 80);
    prompt.push_str(REFLECTION_PERSONA.trim_end());
    prompt.push_str("\n\n");
    for turn in history {
        let speaker = match turn.role {
            TurnRole::User => "User",
            TurnRole::Assistant => "Assistant",
        };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
        prompt.push('\n');
    }
    prompt.push_str("\nAssistant:");
    prompt
}

/// Render the transcript as `role: content` lines
#[must_use]
pub fn render_transcript(history: &[ConversationTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the agreement document request
#[must_use]
pub fn render_agreement_prompt(
    history: &[ConversationTurn],
    agreement_type: &str,
    participants: &str,
    today: NaiveDate,
) -> String {
    let today = format_date(today);
    let transcript = render_transcript(history);

    format!(
        "Create a heartfelt agreement based on this conversation.

IMPORTANT INSTRUCTIONS:
- Use the EXACT names mentioned in the conversation
- Use TODAY'S DATE: {today}
- Keep it simple and heartfelt
- No placeholders like [Add specific examples here]
- Write complete sentences based on what was actually discussed
- Agreement type: {agreement_type}
- Participants: {participants}

Conversation:
{transcript}

Write a complete agreement with specific commitments based on what was discussed. Make it beautiful and meaningful.

Format:
AGREEMENT

Between: [exact names from conversation]
Date: {today}

[Purpose based on conversation]

We agree to:
- [Specific commitment 1]
- [Specific commitment 2]
- [Specific commitment 3]

This agreement is made in good faith and mutual understanding.

___________________          ___________________
Signature                    Signature"
    )
}

/// Generic but complete agreement used when generation fails
///
/// Carries the real participants and date and no bracketed placeholders.
#[must_use]
pub fn fallback_agreement(participants: &str, today: NaiveDate) -> String {
    let today = format_date(today);
    format!(
        "AGREEMENT

Between: {participants}
Date: {today}

This agreement represents our commitment to clarity, respect, and mutual understanding.

Through our conversation, we have shared what matters most to us.

We agree to:
- Honor the trust and care we hold for each other
- Communicate openly and with compassion
- Support each other's growth and well-being
- Hold ourselves accountable to these commitments

This agreement is made in good faith and mutual understanding.

___________________          ___________________
Signature                    Signature"
    )
}
