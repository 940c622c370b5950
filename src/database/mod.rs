// ABOUTME: Database connection management and schema migrations for the agreement store
// ABOUTME: Owns the SQLite pool and hands out per-table managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Database Management
//!
//! `SQLite` storage for the agreement catalog, the agreement records, and their
//! signing photos. Schema is created in code with `CREATE TABLE IF NOT EXISTS`
//! on startup; the UNIQUE constraints back the one-record-per-session and
//! one-photo-per-agreement invariants.

mod agreement_types;
mod agreements;
mod photos;

pub use agreement_types::AgreementTypeManager;
pub use agreements::AgreementManager;
pub use photos::PhotoManager;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Database manager for the agreement store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// In-memory databases get a single-connection pool so every query sees
    /// the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL {url}: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::database(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {url}: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database = %url, "Database ready");

        Ok(db)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Agreement record operations
    #[must_use]
    pub fn agreements(&self) -> AgreementManager {
        AgreementManager::new(self.pool.clone())
    }

    /// Catalog operations
    #[must_use]
    pub fn agreement_types(&self) -> AgreementTypeManager {
        AgreementTypeManager::new(self.pool.clone())
    }

    /// Photo operations
    #[must_use]
    pub fn photos(&self) -> PhotoManager {
        PhotoManager::new(self.pool.clone())
    }

    /// Liveness probe for readiness checks
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_agreement_types().await?;
        self.migrate_agreements().await?;
        self.migrate_photos().await?;
        debug!("Database migrations applied");
        Ok(())
    }

    async fn migrate_agreement_types(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS agreement_types (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                icon TEXT NOT NULL DEFAULT ''
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create agreement_types: {e}")))?;

        Ok(())
    }

    async fn migrate_agreements(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS agreements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                agreement_type_id INTEGER NOT NULL REFERENCES agreement_types(id),
                participants TEXT NOT NULL DEFAULT '',
                conversation_history TEXT NOT NULL DEFAULT '[]',
                agreement_text TEXT NOT NULL DEFAULT '',
                edited_text TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'draft'
                    CHECK (status IN ('draft', 'reflection', 'review', 'signed', 'completed')),
                session_key TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                signed_at TEXT,
                completed_at TEXT,
                is_archived BOOLEAN NOT NULL DEFAULT 1
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create agreements: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_agreements_archive ON agreements(status, is_archived, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create archive index: {e}")))?;

        Ok(())
    }

    async fn migrate_photos(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS photos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                agreement_id INTEGER NOT NULL UNIQUE REFERENCES agreements(id),
                image_path TEXT NOT NULL,
                content_type TEXT,
                uploaded_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create photos: {e}")))?;

        Ok(())
    }
}

/// Whether `error` is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation())
}
