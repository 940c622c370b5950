// ABOUTME: Database operations for the agreement type catalog
// ABOUTME: Read access for the selection step plus idempotent seeding by slug
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use studio_core::models::AgreementType;
use tracing::info;

use crate::constants::{AgreementTypeSeed, DEFAULT_AGREEMENT_TYPES};
use crate::errors::{AppError, AppResult};

/// Catalog database operations manager
pub struct AgreementTypeManager {
    pool: SqlitePool,
}

impl AgreementTypeManager {
    /// Create a new catalog manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_type(row: &SqliteRow) -> AgreementType {
        AgreementType {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
            description: row.get("description"),
            icon: row.get("icon"),
        }
    }

    /// List all agreement types in catalog order
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self) -> AppResult<Vec<AgreementType>> {
        let rows = sqlx::query(
            "SELECT id, name, slug, description, icon FROM agreement_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list agreement types: {e}")))?;

        Ok(rows.iter().map(Self::row_to_type).collect())
    }

    /// Get an agreement type by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: i64) -> AppResult<Option<AgreementType>> {
        let row = sqlx::query(
            "SELECT id, name, slug, description, icon FROM agreement_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get agreement type: {e}")))?;

        Ok(row.as_ref().map(Self::row_to_type))
    }

    /// Get an agreement type by slug
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Option<AgreementType>> {
        let row = sqlx::query(
            "SELECT id, name, slug, description, icon FROM agreement_types WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get agreement type: {e}")))?;

        Ok(row.as_ref().map(Self::row_to_type))
    }

    /// Fetch the type with `seed.slug`, inserting it when absent
    ///
    /// Existing rows are left untouched. Returns the row and whether it was
    /// created by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_or_create(&self, seed: &AgreementTypeSeed) -> AppResult<(AgreementType, bool)> {
        let result = sqlx::query(
            r"
            INSERT INTO agreement_types (name, slug, description, icon)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(slug) DO NOTHING
            ",
        )
        .bind(seed.name)
        .bind(seed.slug)
        .bind(seed.description)
        .bind(seed.icon)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to seed agreement type: {e}")))?;

        let agreement_type = self
            .get_by_slug(seed.slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Agreement type {}", seed.slug)))?;

        Ok((agreement_type, result.rows_affected() > 0))
    }

    /// Seed the default catalog, returning how many rows were created
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn seed_defaults(&self) -> AppResult<usize> {
        let mut created = 0;
        for seed in DEFAULT_AGREEMENT_TYPES {
            let (agreement_type, inserted) = self.get_or_create(seed).await?;
            if inserted {
                info!(slug = %agreement_type.slug, "Created agreement type");
                created += 1;
            }
        }
        Ok(created)
    }
}
