// ABOUTME: Signing photo record and archive listing entry
// ABOUTME: One photo per agreement, joined with its type for the exhibition archive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Agreement, AgreementType};

/// Photo of the signing moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Row ID
    pub id: i64,
    /// Agreement this photo belongs to (one-to-one)
    pub agreement_id: i64,
    /// Blob path relative to the media root
    pub image_path: String,
    /// Declared MIME type, when known
    pub content_type: Option<String>,
    /// When the photo was stored
    pub uploaded_at: DateTime<Utc>,
}

/// Completed agreement as listed in the exhibition archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// The agreement itself
    pub agreement: Agreement,
    /// Its catalog type
    pub agreement_type: AgreementType,
    /// Signing photo
    pub photo: Option<Photo>,
}

impl ArchiveEntry {
    /// Text shown on the exhibited artifact
    #[must_use]
    pub fn final_text(&self) -> &str {
        self.agreement.final_text()
    }
}
