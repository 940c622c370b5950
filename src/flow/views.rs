// ABOUTME: JSON views rendered for each flow step
// ABOUTME: Read models built from the agreement record; a template layer can sit on top
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use chrono::{DateTime, Utc};
use serde::Serialize;
use studio_core::models::{
    Agreement, AgreementStatus, AgreementType, ArchiveEntry, ConversationTurn, Photo,
};

/// Selection step
#[derive(Debug, Clone, Serialize)]
pub struct SelectView {
    /// Catalog in display order
    pub agreement_types: Vec<AgreementType>,
}

/// Reflection step
#[derive(Debug, Clone, Serialize)]
pub struct ReflectionView {
    /// Record ID
    pub agreement_id: i64,
    /// Current status
    pub status: AgreementStatus,
    /// Agreement type name
    pub agreement_type: String,
    /// Participants, possibly blank
    pub participants: String,
    /// Dialogue so far
    pub conversation_history: Vec<ConversationTurn>,
    /// Number of turns
    pub message_count: usize,
}

/// Answer to one chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    /// Assistant reply
    pub response: String,
    /// Turns after appending both
    pub message_count: usize,
}

/// Review and print steps
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    /// Record ID
    pub agreement_id: i64,
    /// Current status
    pub status: AgreementStatus,
    /// Participants
    pub participants: String,
    /// Text to show: edited text if any, else generated text
    pub agreement_text: String,
    /// When printing was confirmed
    pub signed_at: Option<DateTime<Utc>>,
}

impl From<&Agreement> for DocumentView {
    fn from(agreement: &Agreement) -> Self {
        Self {
            agreement_id: agreement.id,
            status: agreement.status,
            participants: agreement.participants.clone(),
            agreement_text: agreement.final_text().to_owned(),
            signed_at: agreement.signed_at,
        }
    }
}

/// Photo step
#[derive(Debug, Clone, Serialize)]
pub struct PhotoView {
    /// Record ID
    pub agreement_id: i64,
    /// Current status
    pub status: AgreementStatus,
    /// Inline error from a rejected submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PhotoView {
    /// View of `agreement` with an optional inline error
    #[must_use]
    pub fn new(agreement: &Agreement, error: Option<String>) -> Self {
        Self {
            agreement_id: agreement.id,
            status: agreement.status,
            error,
        }
    }
}

/// Completion step
#[derive(Debug, Clone, Serialize)]
pub struct CompleteView {
    /// Record ID
    pub agreement_id: i64,
    /// Participants
    pub participants: String,
    /// Final agreement text
    pub agreement_text: String,
    /// When the photo completed the agreement
    pub completed_at: Option<DateTime<Utc>>,
}

/// One exhibited agreement
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveItem {
    /// Record ID
    pub id: i64,
    /// Agreement type name
    pub agreement_type: String,
    /// Agreement type icon
    pub icon: String,
    /// Participants
    pub participants: String,
    /// Final agreement text
    pub agreement_text: String,
    /// Status label
    pub status: &'static str,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Print confirmation time
    pub signed_at: Option<DateTime<Utc>>,
    /// Completion time
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether the record is listed in the archive
    pub is_archived: bool,
    /// Signing photo
    pub photo: Option<Photo>,
}

impl From<ArchiveEntry> for ArchiveItem {
    fn from(entry: ArchiveEntry) -> Self {
        let agreement_text = entry.final_text().to_owned();
        Self {
            id: entry.agreement.id,
            agreement_type: entry.agreement_type.name,
            icon: entry.agreement_type.icon,
            participants: entry.agreement.participants,
            agreement_text,
            status: entry.agreement.status.label(),
            created_at: entry.agreement.created_at,
            signed_at: entry.agreement.signed_at,
            completed_at: entry.agreement.completed_at,
            is_archived: entry.agreement.is_archived,
            photo: entry.photo,
        }
    }
}

/// Exhibition archive
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveView {
    /// Completed, archived agreements, newest first
    pub agreements: Vec<ArchiveItem>,
    /// Number of listed agreements
    pub total_count: usize,
}
