// ABOUTME: Agreement type catalog entry
// ABOUTME: Immutable seed data describing the kinds of agreements on offer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use serde::{Deserialize, Serialize};

/// A kind of agreement participants can choose to write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementType {
    /// Row ID
    pub id: i64,
    /// Display name, also handed to the generator
    pub name: String,
    /// Unique slug
    pub slug: String,
    /// Short description shown on the selection step
    pub description: String,
    /// Emoji or icon class
    pub icon: String,
}
