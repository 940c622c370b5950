// ABOUTME: Database operations for signing photos
// ABOUTME: Attaches the single photo and completes its agreement in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use sqlx::{Row, SqlitePool};
use studio_core::models::{Agreement, Photo};

use super::agreements::write_agreement;
use super::is_unique_violation;
use crate::errors::{AppError, AppResult};

/// Photo database operations manager
pub struct PhotoManager {
    pool: SqlitePool,
}

impl PhotoManager {
    /// Create a new photo manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the photo row and save `agreement` atomically
    ///
    /// `agreement` is expected to already carry its completed status and
    /// timestamp. Nothing is written if either statement fails.
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the agreement already has a photo,
    /// or a database error
    pub async fn attach_and_complete(
        &self,
        agreement: &Agreement,
        image_path: &str,
        content_type: Option<&str>,
    ) -> AppResult<Photo> {
        let uploaded_at = agreement.completed_at.unwrap_or_else(chrono::Utc::now);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO photos (agreement_id, image_path, content_type, uploaded_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(agreement.id)
        .bind(image_path)
        .bind(content_type)
        .bind(uploaded_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("Agreement {} already has a photo", agreement.id))
            } else {
                AppError::database(format!("Failed to attach photo: {e}"))
            }
        })?;

        write_agreement(&mut *tx, agreement).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit photo: {e}")))?;

        Ok(Photo {
            id: result.last_insert_rowid(),
            agreement_id: agreement.id,
            image_path: image_path.to_owned(),
            content_type: content_type.map(ToOwned::to_owned),
            uploaded_at,
        })
    }

    /// Get the photo of an agreement
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_for_agreement(&self, agreement_id: i64) -> AppResult<Option<Photo>> {
        let row = sqlx::query(
            r"
            SELECT id, agreement_id, image_path, content_type, uploaded_at
            FROM photos
            WHERE agreement_id = $1
            ",
        )
        .bind(agreement_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get photo: {e}")))?;

        row.map(|r| -> AppResult<Photo> {
            Ok(Photo {
                id: r.try_get("id")?,
                agreement_id: r.try_get("agreement_id")?,
                image_path: r.try_get("image_path")?,
                content_type: r.try_get("content_type")?,
                uploaded_at: r.try_get("uploaded_at")?,
            })
        })
        .transpose()
    }
}
