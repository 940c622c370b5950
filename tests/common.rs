// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Builds in-memory databases, flows and routers around a scripted provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `agreement_studio`

use std::sync::{Arc, Once};
use std::time::Duration;

use agreement_studio::{
    assistant::RetryPolicy,
    config::environment::{AssistantConfig, DatabaseUrl},
    database::Database,
    flow::{AgreementFlow, SessionToken},
    llm::LlmProvider,
    photos::PhotoStore,
    resources::StudioResources,
    routes,
};
use anyhow::Result;
use axum::Router;
use studio_core::models::{Agreement, AgreementType};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Staff token configured on test resources
pub const STAFF_TOKEN: &str = "test-staff-token";

/// 1x1 transparent PNG as a data URL
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup, seeded with the default catalog
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new(&DatabaseUrl::Memory).await?;
    database.agreement_types().seed_defaults().await?;
    Ok(database)
}

/// Budgets with no pauses and short timeouts
pub fn fast_assistant_config() -> AssistantConfig {
    AssistantConfig {
        chat: RetryPolicy {
            max_attempts: 2,
            pause: Duration::ZERO,
            timeout: Duration::from_millis(200),
        },
        generator: RetryPolicy {
            max_attempts: 1,
            pause: Duration::ZERO,
            timeout: Duration::from_millis(200),
        },
    }
}

/// Everything a test needs, with the temp media dir kept alive
pub struct TestStudio {
    pub resources: Arc<StudioResources>,
    pub media: TempDir,
}

impl TestStudio {
    pub fn flow(&self) -> &AgreementFlow {
        &self.resources.flow
    }

    pub fn database(&self) -> &Database {
        &self.resources.database
    }

    /// Full router, as served
    pub fn router(&self) -> Router {
        routes::router(self.resources.clone())
    }
}

/// Test resources over `provider`, with a staff token and a temp media root
pub async fn create_test_studio(provider: Arc<dyn LlmProvider>) -> Result<TestStudio> {
    let database = create_test_database().await?;
    let media = tempfile::tempdir()?;

    let resources = StudioResources::builder(database, provider)
        .assistant(fast_assistant_config())
        .photo_store(PhotoStore::new(media.path()))
        .staff_token(Some(STAFF_TOKEN))
        .build();

    Ok(TestStudio {
        resources: Arc::new(resources),
        media,
    })
}

/// Catalog entry by slug
pub async fn agreement_type(database: &Database, slug: &str) -> Result<AgreementType> {
    database
        .agreement_types()
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("agreement type {slug} not seeded"))
}

/// Start a session for `slug`
pub async fn start_session(
    studio: &TestStudio,
    slug: &str,
    participants: Option<&str>,
) -> Result<(SessionToken, Agreement)> {
    let agreement_type = agreement_type(studio.database(), slug).await?;
    Ok(studio
        .flow()
        .select_type(agreement_type.id, participants)
        .await?)
}

/// Drive a session all the way to completed
pub async fn complete_session(studio: &TestStudio, participants: &str) -> Result<Agreement> {
    let (token, _) = start_session(studio, "love-partnership", Some(participants)).await?;
    studio.flow().chat(&token, "We want to listen more").await?;
    studio.flow().generate(&token).await?;
    studio.flow().submit_review(&token, "Our final words").await?;
    studio.flow().confirm_print(&token).await?;

    match studio
        .flow()
        .submit_photo(
            &token,
            Some(agreement_studio::photos::PhotoPayload::DataUrl(
                PNG_DATA_URL.to_owned(),
            )),
        )
        .await?
    {
        agreement_studio::flow::PhotoOutcome::Completed(agreement) => Ok(agreement),
        agreement_studio::flow::PhotoOutcome::Rejected(view) => {
            anyhow::bail!("photo rejected: {:?}", view.error)
        }
    }
}
