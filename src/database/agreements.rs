// ABOUTME: Database operations for agreement records bound to browser sessions
// ABOUTME: Create, fetch by token or id, whole-record save, and archive listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use studio_core::models::{
    Agreement, AgreementStatus, AgreementType, ArchiveEntry, ConversationTurn, Photo,
};

use super::is_unique_violation;
use crate::errors::{AppError, AppResult};

const AGREEMENT_COLUMNS: &str = "a.id, a.agreement_type_id, a.participants, a.conversation_history, \
     a.agreement_text, a.edited_text, a.status, a.session_key, a.created_at, a.signed_at, \
     a.completed_at, a.is_archived";

const ARCHIVE_JOIN: &str = "t.name AS type_name, t.slug AS type_slug, \
     t.description AS type_description, t.icon AS type_icon, \
     p.id AS photo_id, p.image_path AS photo_path, p.content_type AS photo_content_type, \
     p.uploaded_at AS photo_uploaded_at \
     FROM agreements a \
     JOIN agreement_types t ON t.id = a.agreement_type_id \
     LEFT JOIN photos p ON p.agreement_id = a.id";

/// Agreement record database operations manager
pub struct AgreementManager {
    pool: SqlitePool,
}

impl AgreementManager {
    /// Create a new agreement manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a draft agreement for a new session
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the session key is taken, or a
    /// database error
    pub async fn create(
        &self,
        agreement_type_id: i64,
        session_key: &str,
        participants: &str,
    ) -> AppResult<Agreement> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO agreements (agreement_type_id, participants, conversation_history, status, session_key, created_at, is_archived)
            VALUES ($1, $2, '[]', $3, $4, $5, 1)
            ",
        )
        .bind(agreement_type_id)
        .bind(participants)
        .bind(AgreementStatus::Draft.as_str())
        .bind(session_key)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("Session already has an agreement")
            } else {
                AppError::database(format!("Failed to create agreement: {e}"))
            }
        })?;

        Ok(Agreement {
            id: result.last_insert_rowid(),
            agreement_type_id,
            participants: participants.to_owned(),
            conversation_history: Vec::new(),
            agreement_text: String::new(),
            edited_text: String::new(),
            status: AgreementStatus::Draft,
            session_key: session_key.to_owned(),
            created_at: now,
            signed_at: None,
            completed_at: None,
            is_archived: true,
        })
    }

    /// Find the agreement bound to a session key
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_by_session_key(&self, session_key: &str) -> AppResult<Option<Agreement>> {
        let row = sqlx::query(&format!(
            "SELECT {AGREEMENT_COLUMNS} FROM agreements a WHERE a.session_key = $1"
        ))
        .bind(session_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get agreement: {e}")))?;

        row.as_ref().map(row_to_agreement).transpose()
    }

    /// Get the agreement bound to a session key
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no agreement uses the key
    pub async fn get_by_session_key(&self, session_key: &str) -> AppResult<Agreement> {
        self.find_by_session_key(session_key)
            .await?
            .ok_or_else(|| AppError::not_found("Agreement"))
    }

    /// Get an agreement by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Agreement>> {
        let row = sqlx::query(&format!(
            "SELECT {AGREEMENT_COLUMNS} FROM agreements a WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get agreement: {e}")))?;

        row.as_ref().map(row_to_agreement).transpose()
    }

    /// Write every mutable field of the record
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the record is gone, or a database error
    pub async fn save(&self, agreement: &Agreement) -> AppResult<()> {
        write_agreement(&self.pool, agreement).await
    }

    /// Include or exclude a record from the exhibition archive
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the record does not exist
    pub async fn set_archived(&self, id: i64, archived: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE agreements SET is_archived = $1 WHERE id = $2")
            .bind(archived)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update archive flag: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Agreement {id}")));
        }
        Ok(())
    }

    /// Completed, archived records with their type and photo, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_completed_archived(&self) -> AppResult<Vec<ArchiveEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {AGREEMENT_COLUMNS}, {ARCHIVE_JOIN} \
             WHERE a.status = $1 AND a.is_archived = 1 \
             ORDER BY a.created_at DESC, a.id DESC"
        ))
        .bind(AgreementStatus::Completed.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list archive: {e}")))?;

        rows.iter().map(row_to_archive_entry).collect()
    }

    /// Number of completed, archived records
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn count_completed_archived(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM agreements WHERE status = $1 AND is_archived = 1",
        )
        .bind(AgreementStatus::Completed.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count archive: {e}")))?;

        Ok(count)
    }

    /// Any record by ID with its type and photo
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_archive_entry(&self, id: i64) -> AppResult<Option<ArchiveEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {AGREEMENT_COLUMNS}, {ARCHIVE_JOIN} WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get archive entry: {e}")))?;

        row.as_ref().map(row_to_archive_entry).transpose()
    }
}

/// Write every mutable field of `agreement` through `executor`
///
/// Shared with the photo transaction so completion and the photo row commit
/// together.
pub(super) async fn write_agreement<'e, E>(executor: E, agreement: &Agreement) -> AppResult<()>
where
    E: SqliteExecutor<'e>,
{
    let history = serde_json::to_string(&agreement.conversation_history)
        .map_err(|e| AppError::serialization(format!("Failed to encode history: {e}")))?;

    let result = sqlx::query(
        r"
        UPDATE agreements
        SET participants = $1, conversation_history = $2, agreement_text = $3,
            edited_text = $4, status = $5, signed_at = $6, completed_at = $7, is_archived = $8
        WHERE id = $9
        ",
    )
    .bind(&agreement.participants)
    .bind(history)
    .bind(&agreement.agreement_text)
    .bind(&agreement.edited_text)
    .bind(agreement.status.as_str())
    .bind(agreement.signed_at)
    .bind(agreement.completed_at)
    .bind(agreement.is_archived)
    .bind(agreement.id)
    .execute(executor)
    .await
    .map_err(|e| AppError::database(format!("Failed to save agreement: {e}")))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("Agreement {}", agreement.id)));
    }
    Ok(())
}

fn row_to_agreement(row: &SqliteRow) -> AppResult<Agreement> {
    let history: String = row.try_get("conversation_history")?;
    let conversation_history: Vec<ConversationTurn> = serde_json::from_str(&history)
        .map_err(|e| AppError::serialization(format!("Corrupt conversation history: {e}")))?;
    let status: String = row.try_get("status")?;

    Ok(Agreement {
        id: row.try_get("id")?,
        agreement_type_id: row.try_get("agreement_type_id")?,
        participants: row.try_get("participants")?,
        conversation_history,
        agreement_text: row.try_get("agreement_text")?,
        edited_text: row.try_get("edited_text")?,
        status: status.parse()?,
        session_key: row.try_get("session_key")?,
        created_at: row.try_get("created_at")?,
        signed_at: row.try_get("signed_at")?,
        completed_at: row.try_get("completed_at")?,
        is_archived: row.try_get("is_archived")?,
    })
}

fn row_to_archive_entry(row: &SqliteRow) -> AppResult<ArchiveEntry> {
    let agreement = row_to_agreement(row)?;
    let agreement_type = AgreementType {
        id: agreement.agreement_type_id,
        name: row.try_get("type_name")?,
        slug: row.try_get("type_slug")?,
        description: row.try_get("type_description")?,
        icon: row.try_get("type_icon")?,
    };

    let photo = match row.try_get::<Option<i64>, _>("photo_id")? {
        Some(photo_id) => Some(Photo {
            id: photo_id,
            agreement_id: agreement.id,
            image_path: row.try_get("photo_path")?,
            content_type: row.try_get("photo_content_type")?,
            uploaded_at: row.try_get("photo_uploaded_at")?,
        }),
        None => None,
    };

    Ok(ArchiveEntry {
        agreement,
        agreement_type,
        photo,
    })
}
