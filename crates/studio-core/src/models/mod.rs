// ABOUTME: Domain model module for the agreement workflow
// ABOUTME: Re-exports the agreement aggregate, catalog entries, and photo records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

mod agreement;
mod agreement_type;
mod photo;

pub use agreement::{Agreement, AgreementStatus, ConversationTurn, TurnRole};
pub use agreement_type::AgreementType;
pub use photo::{ArchiveEntry, Photo};
