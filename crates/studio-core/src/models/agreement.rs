// ABOUTME: Agreement aggregate root with its status lifecycle and dialogue history
// ABOUTME: Enforces forward-only status moves and set-once timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::paths;
use crate::errors::{AppError, AppResult};

/// Placeholder participants string used when none can be extracted
const DEFAULT_PARTICIPANTS: &str = "Participants";

/// Lifecycle status of an agreement
///
/// Variants are declared in flow order, so the derived `Ord` is the
/// progression order. Status only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementStatus {
    /// Created, nothing captured yet
    Draft,
    /// Conversational reflection in progress
    Reflection,
    /// Text generated, awaiting review
    Review,
    /// Text accepted, printing and signing
    Signed,
    /// Signing photo stored
    Completed,
}

impl AgreementStatus {
    /// All statuses in flow order
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Reflection,
        Self::Review,
        Self::Signed,
        Self::Completed,
    ];

    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Reflection => "reflection",
            Self::Review => "review",
            Self::Signed => "signed",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Reflection => "In Reflection",
            Self::Review => "Under Review",
            Self::Signed => "Signed",
            Self::Completed => "Completed",
        }
    }

    /// Whether moving to `next` keeps the status monotonic
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        next >= self
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgreementStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::invalid_format(format!("Unknown agreement status: {s}")))
    }
}

/// Speaker of a dialogue turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// A participant
    User,
    /// The reflection assistant
    Assistant,
}

impl TurnRole {
    /// Label used when rendering transcripts for a prompt
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of the reflection dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke
    pub role: TurnRole,
    /// What was said
    pub content: String,
}

impl ConversationTurn {
    /// Participant turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// Assistant turn
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// One in-progress or finished agreement, bound to a single browser session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    /// Row ID
    pub id: i64,
    /// Catalog type this agreement was started from
    pub agreement_type_id: i64,
    /// Free-text participant names
    pub participants: String,
    /// Reflection dialogue, append-only
    pub conversation_history: Vec<ConversationTurn>,
    /// Generator output
    pub agreement_text: String,
    /// User override of the generated text
    pub edited_text: String,
    /// Lifecycle status
    pub status: AgreementStatus,
    /// Opaque session token
    #[serde(skip_serializing, default)]
    pub session_key: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When printing/signing was confirmed
    pub signed_at: Option<DateTime<Utc>>,
    /// When the signing photo was stored
    pub completed_at: Option<DateTime<Utc>>,
    /// Eligible for the exhibition archive
    pub is_archived: bool,
}

impl Agreement {
    /// Text shown for review, print, and archive
    ///
    /// The edited text wins whenever it is non-empty.
    #[must_use]
    pub fn final_text(&self) -> &str {
        if self.edited_text.is_empty() {
            &self.agreement_text
        } else {
            &self.edited_text
        }
    }

    /// Move the status forward
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if `next` would move the status backward.
    pub fn advance_to(&mut self, next: AgreementStatus) -> AppResult<()> {
        if !self.status.can_advance_to(next) {
            return Err(AppError::invalid_transition(format!(
                "Agreement {} cannot move from {} back to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Append one dialogue turn
    pub fn push_turn(&mut self, turn: ConversationTurn) {
        self.conversation_history.push(turn);
    }

    /// Number of dialogue turns so far
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.conversation_history.len()
    }

    /// Fill `participants` from the dialogue when it is still blank
    ///
    /// Takes the first participant turn that mentions "between", else a
    /// generic label. Returns `true` when the field was filled.
    pub fn fill_participants_if_blank(&mut self) -> bool {
        if !self.participants.trim().is_empty() {
            return false;
        }
        self.participants = self
            .conversation_history
            .iter()
            .find(|turn| {
                turn.role == TurnRole::User && turn.content.to_lowercase().contains("between")
            })
            .map_or_else(|| DEFAULT_PARTICIPANTS.to_owned(), |turn| turn.content.clone());
        true
    }

    /// Record the print/sign confirmation time if not already recorded
    ///
    /// Returns `true` when the timestamp was set by this call.
    pub fn mark_signed(&mut self, now: DateTime<Utc>) -> bool {
        if self.signed_at.is_some() {
            return false;
        }
        self.signed_at = Some(now);
        true
    }

    /// Mark the agreement completed
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the status cannot move to completed.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.advance_to(AgreementStatus::Completed)?;
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        Ok(())
    }

    /// Flow path where this agreement should pick up again
    #[must_use]
    pub const fn resume_path(&self) -> &'static str {
        match self.status {
            AgreementStatus::Draft | AgreementStatus::Reflection => paths::REFLECTION,
            AgreementStatus::Review => paths::REVIEW,
            AgreementStatus::Signed => {
                if self.signed_at.is_some() {
                    paths::PHOTO
                } else {
                    paths::PRINT
                }
            }
            AgreementStatus::Completed => paths::COMPLETE,
        }
    }
}
