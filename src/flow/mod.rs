// ABOUTME: Session state machine driving one agreement from type selection to completion
// ABOUTME: Resolves the session token, guards each step on status, and persists every change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Agreement Flow
//!
//! select type → converse → generate → review/edit → print → photograph → complete
//!
//! Every operation except selection takes the caller's [`SessionToken`]. An
//! unresolvable token is `SessionMissing`, which the route layer turns into a
//! redirect. Status only moves forward: all writes go through
//! `Agreement::advance_to`.

mod session;
pub mod views;

pub use session::SessionToken;

use chrono::{Local, NaiveDate, Utc};
use studio_core::models::{Agreement, AgreementStatus, ArchiveEntry, ConversationTurn};
use tracing::{info, instrument, warn};

use crate::assistant::{AgreementGenerator, ConversationClient};
use crate::database::Database;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::logging::AppLogger;
use crate::photos::{PhotoPayload, PhotoStore};
use views::{
    ArchiveItem, ArchiveView, ChatReply, CompleteView, DocumentView, PhotoView, ReflectionView,
    SelectView,
};

/// Inline error shown when the photo form arrives without a photo
pub const MISSING_PHOTO_MESSAGE: &str = "Please capture or upload a photo";

/// Result of a photo submission
#[derive(Debug, Clone)]
pub enum PhotoOutcome {
    /// Photo stored, agreement completed
    Completed(Agreement),
    /// Nothing stored; re-render the step with the inline error
    Rejected(PhotoView),
}

/// Result of visiting the completion step
#[derive(Debug, Clone)]
pub enum CompleteOutcome {
    /// Agreement is completed; the session should end
    Finished(CompleteView),
    /// Agreement is not done yet; continue at this path
    Resume(&'static str),
}

/// The agreement workflow service
#[derive(Clone)]
pub struct AgreementFlow {
    database: Database,
    conversation: ConversationClient,
    generator: AgreementGenerator,
    photos: PhotoStore,
}

impl AgreementFlow {
    /// Create the flow over its collaborators
    #[must_use]
    pub const fn new(
        database: Database,
        conversation: ConversationClient,
        generator: AgreementGenerator,
        photos: PhotoStore,
    ) -> Self {
        Self {
            database,
            conversation,
            generator,
            photos,
        }
    }

    /// Underlying database
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }

    /// Photo blob store
    #[must_use]
    pub const fn photo_store(&self) -> &PhotoStore {
        &self.photos
    }

    /// Resolve the session token to its agreement
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing` if no agreement uses the token
    pub async fn resolve(&self, token: &SessionToken) -> AppResult<Agreement> {
        self.database
            .agreements()
            .find_by_session_key(token.as_str())
            .await?
            .ok_or_else(AppError::session_missing)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Catalog for the selection step
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn select_page(&self) -> AppResult<SelectView> {
        Ok(SelectView {
            agreement_types: self.database.agreement_types().list().await?,
        })
    }

    /// Start a new agreement of `agreement_type_id`
    ///
    /// Creates the record, moves it into reflection, and returns the fresh
    /// session token for the caller to set.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown type
    #[instrument(skip(self, participants))]
    pub async fn select_type(
        &self,
        agreement_type_id: i64,
        participants: Option<&str>,
    ) -> AppResult<(SessionToken, Agreement)> {
        let agreement_type = self
            .database
            .agreement_types()
            .get(agreement_type_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Agreement type {agreement_type_id}")))?;

        let token = SessionToken::generate();
        let mut agreement = self
            .database
            .agreements()
            .create(
                agreement_type.id,
                token.as_str(),
                participants.map(str::trim).unwrap_or_default(),
            )
            .await?;

        advance(&mut agreement, AgreementStatus::Reflection)?;
        self.database.agreements().save(&agreement).await?;

        info!(
            agreement.id = agreement.id,
            agreement_type = %agreement_type.slug,
            "Agreement session started"
        );
        Ok((token, agreement))
    }

    // ========================================================================
    // Reflection
    // ========================================================================

    /// Current dialogue for the reflection step
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing` for an unresolvable token
    pub async fn reflection(&self, token: &SessionToken) -> AppResult<ReflectionView> {
        let agreement = self.resolve(token).await?;
        let agreement_type = self.agreement_type_name(&agreement).await?;

        Ok(ReflectionView {
            agreement_id: agreement.id,
            status: agreement.status,
            agreement_type,
            participants: agreement.participants.clone(),
            message_count: agreement.message_count(),
            conversation_history: agreement.conversation_history,
        })
    }

    /// Append a participant message and the assistant's reply
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing`, `InvalidInput` for a blank message, or
    /// `InvalidTransition` once reflection is over
    #[instrument(skip(self, token, message))]
    pub async fn chat(&self, token: &SessionToken, message: &str) -> AppResult<ChatReply> {
        let mut agreement = self.resolve(token).await?;

        if agreement.status != AgreementStatus::Reflection {
            return Err(AppError::invalid_transition(format!(
                "Agreement {} is no longer in reflection ({})",
                agreement.id, agreement.status
            )));
        }
        if message.trim().is_empty() {
            return Err(AppError::invalid_input("Message must not be empty"));
        }

        agreement.push_turn(ConversationTurn::user(message));
        let response = self
            .conversation
            .reply(&agreement.conversation_history)
            .await
            .into_text();
        agreement.push_turn(ConversationTurn::assistant(response.clone()));

        self.database.agreements().save(&agreement).await?;

        Ok(ChatReply {
            response,
            message_count: agreement.message_count(),
        })
    }

    /// Generate the agreement text and move to review
    ///
    /// Runs the generator only while the record is in reflection; later calls
    /// leave the stored text alone.
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing` for an unresolvable token
    #[instrument(skip(self, token))]
    pub async fn generate(&self, token: &SessionToken) -> AppResult<Agreement> {
        self.generate_on(token, Local::now().date_naive()).await
    }

    /// [`Self::generate`] with an explicit document date
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing` for an unresolvable token
    pub async fn generate_on(&self, token: &SessionToken, today: NaiveDate) -> AppResult<Agreement> {
        let mut agreement = self.resolve(token).await?;

        if agreement.status >= AgreementStatus::Review {
            return Ok(agreement);
        }
        if agreement.conversation_history.is_empty() {
            warn!(agreement.id = agreement.id, "Generating agreement without any dialogue");
        }

        agreement.fill_participants_if_blank();
        let agreement_type = self.agreement_type_name(&agreement).await?;

        let completion = self
            .generator
            .generate(
                &agreement.conversation_history,
                &agreement_type,
                &agreement.participants,
                today,
            )
            .await;
        agreement.agreement_text = completion.into_text();

        advance(&mut agreement, AgreementStatus::Review)?;
        self.database.agreements().save(&agreement).await?;
        Ok(agreement)
    }

    // ========================================================================
    // Review and print
    // ========================================================================

    /// Document for the review step
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing` for an unresolvable token
    pub async fn review(&self, token: &SessionToken) -> AppResult<DocumentView> {
        Ok(DocumentView::from(&self.resolve(token).await?))
    }

    /// Store the participants' edit verbatim and move to signed
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing`, or `InvalidTransition` outside review/signed
    #[instrument(skip(self, token, text))]
    pub async fn submit_review(&self, token: &SessionToken, text: &str) -> AppResult<Agreement> {
        let mut agreement = self.resolve(token).await?;

        if !matches!(
            agreement.status,
            AgreementStatus::Review | AgreementStatus::Signed
        ) {
            return Err(AppError::invalid_transition(format!(
                "Agreement {} cannot be edited while {}",
                agreement.id, agreement.status
            )));
        }

        text.clone_into(&mut agreement.edited_text);
        advance(&mut agreement, AgreementStatus::Signed)?;
        self.database.agreements().save(&agreement).await?;
        Ok(agreement)
    }

    /// Document for the print step
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing` for an unresolvable token
    pub async fn print(&self, token: &SessionToken) -> AppResult<DocumentView> {
        Ok(DocumentView::from(&self.resolve(token).await?))
    }

    /// Record that the agreement was printed and signed
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing`, or `InvalidTransition` before signed
    #[instrument(skip(self, token))]
    pub async fn confirm_print(&self, token: &SessionToken) -> AppResult<Agreement> {
        let mut agreement = self.resolve(token).await?;

        if agreement.status < AgreementStatus::Signed {
            return Err(AppError::invalid_transition(format!(
                "Agreement {} has not been accepted for signing ({})",
                agreement.id, agreement.status
            )));
        }

        if agreement.mark_signed(Utc::now()) {
            self.database.agreements().save(&agreement).await?;
            info!(agreement.id = agreement.id, "Agreement signed");
        }
        Ok(agreement)
    }

    // ========================================================================
    // Photo and completion
    // ========================================================================

    /// State for the photo step
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing` for an unresolvable token
    pub async fn photo(&self, token: &SessionToken) -> AppResult<PhotoView> {
        Ok(PhotoView::new(&self.resolve(token).await?, None))
    }

    /// Store the signing photo and complete the agreement
    ///
    /// A missing or malformed payload changes nothing and yields
    /// [`PhotoOutcome::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing`, `ResourceAlreadyExists` once completed,
    /// `InvalidTransition` before signed, or a storage/database error
    #[instrument(skip(self, token, payload))]
    pub async fn submit_photo(
        &self,
        token: &SessionToken,
        payload: Option<PhotoPayload>,
    ) -> AppResult<PhotoOutcome> {
        let agreement = self.resolve(token).await?;

        match agreement.status {
            AgreementStatus::Signed => {}
            AgreementStatus::Completed => {
                return Err(AppError::already_exists(format!(
                    "Agreement {} already has its signing photo",
                    agreement.id
                )));
            }
            status => {
                return Err(AppError::invalid_transition(format!(
                    "Agreement {} is not ready for its photo ({status})",
                    agreement.id
                )));
            }
        }

        let Some(payload) = payload else {
            return Ok(PhotoOutcome::Rejected(PhotoView::new(
                &agreement,
                Some(MISSING_PHOTO_MESSAGE.to_owned()),
            )));
        };

        let now = Utc::now();
        let stored = match self.photos.store(&payload, now).await {
            Ok(stored) => stored,
            Err(error) if error.code == ErrorCode::InvalidFormat => {
                warn!(agreement.id = agreement.id, error = %error, "Rejected photo payload");
                return Ok(PhotoOutcome::Rejected(PhotoView::new(
                    &agreement,
                    Some(error.message),
                )));
            }
            Err(error) => return Err(error),
        };

        let mut completed = agreement.clone();
        completed.mark_completed(now)?;

        if let Err(error) = self
            .database
            .photos()
            .attach_and_complete(
                &completed,
                &stored.relative_path,
                stored.content_type.as_deref(),
            )
            .await
        {
            self.photos.remove(&stored.relative_path).await;
            return Err(error);
        }

        AppLogger::log_transition(completed.id, agreement.status, completed.status);
        Ok(PhotoOutcome::Completed(completed))
    }

    /// Final view, or where to resume if the agreement is not done
    ///
    /// # Errors
    ///
    /// Returns `SessionMissing` for an unresolvable token
    pub async fn complete(&self, token: &SessionToken) -> AppResult<CompleteOutcome> {
        let agreement = self.resolve(token).await?;

        if agreement.status != AgreementStatus::Completed {
            return Ok(CompleteOutcome::Resume(agreement.resume_path()));
        }

        Ok(CompleteOutcome::Finished(CompleteView {
            agreement_id: agreement.id,
            agreement_text: agreement.final_text().to_owned(),
            participants: agreement.participants,
            completed_at: agreement.completed_at,
        }))
    }

    // ========================================================================
    // Archive
    // ========================================================================

    /// Exhibition archive listing
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn archive(&self) -> AppResult<ArchiveView> {
        let agreements: Vec<ArchiveItem> = self
            .database
            .agreements()
            .list_completed_archived()
            .await?
            .into_iter()
            .map(ArchiveItem::from)
            .collect();

        Ok(ArchiveView {
            total_count: agreements.len(),
            agreements,
        })
    }

    /// Any single agreement with its type and photo
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id
    pub async fn archive_entry(&self, id: i64) -> AppResult<ArchiveEntry> {
        self.database
            .agreements()
            .get_archive_entry(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Agreement {id}")))
    }

    async fn agreement_type_name(&self, agreement: &Agreement) -> AppResult<String> {
        Ok(self
            .database
            .agreement_types()
            .get(agreement.agreement_type_id)
            .await?
            .map_or_else(|| "Agreement".to_owned(), |t| t.name))
    }
}

/// Move `agreement` forward, logging real changes
fn advance(agreement: &mut Agreement, next: AgreementStatus) -> AppResult<()> {
    let previous = agreement.status;
    agreement.advance_to(next)?;
    if previous != next {
        AppLogger::log_transition(agreement.id, previous, next);
    }
    Ok(())
}
