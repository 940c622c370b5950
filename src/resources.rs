// ABOUTME: Shared resource container handed to every router as axum state
// ABOUTME: Wires the database, provider, assistant clients and photo store into one flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Studio Resources
//!
//! Built once at startup and shared as `Arc<StudioResources>`. Tests build
//! the same container around an in-memory database and a scripted provider.

use std::sync::Arc;

use crate::assistant::{AgreementGenerator, ConversationClient};
use crate::config::environment::{AssistantConfig, ServerConfig};
use crate::database::Database;
use crate::flow::AgreementFlow;
use crate::llm::LlmProvider;
use crate::photos::PhotoStore;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct StudioResources {
    /// Record store
    pub database: Database,
    /// Workflow service over the store, assistant and photo blobs
    pub flow: AgreementFlow,
    /// Provider behind both assistant calls
    pub provider: Arc<dyn LlmProvider>,
    /// Bearer token guarding the archive
    pub staff_token: Option<Arc<str>>,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl StudioResources {
    /// Assemble resources from loaded configuration
    #[must_use]
    pub fn new(database: Database, provider: Arc<dyn LlmProvider>, config: &ServerConfig) -> Self {
        Self::builder(database, provider)
            .assistant(config.assistant)
            .photo_store(PhotoStore::new(config.media_root.clone()))
            .staff_token(config.staff_token.as_deref())
            .secure_cookies(config.secure_cookies)
            .build()
    }

    /// Start a builder with default budgets and a `./media` photo store
    #[must_use]
    pub fn builder(database: Database, provider: Arc<dyn LlmProvider>) -> StudioResourcesBuilder {
        StudioResourcesBuilder {
            database,
            provider,
            assistant: AssistantConfig::default(),
            photos: PhotoStore::new(crate::constants::defaults::MEDIA_ROOT),
            staff_token: None,
            secure_cookies: false,
        }
    }
}

/// Builder for [`StudioResources`]
pub struct StudioResourcesBuilder {
    database: Database,
    provider: Arc<dyn LlmProvider>,
    assistant: AssistantConfig,
    photos: PhotoStore,
    staff_token: Option<Arc<str>>,
    secure_cookies: bool,
}

impl StudioResourcesBuilder {
    /// Retry and timeout budgets for the assistant calls
    #[must_use]
    pub const fn assistant(mut self, assistant: AssistantConfig) -> Self {
        self.assistant = assistant;
        self
    }

    /// Where signing photos are written
    #[must_use]
    pub fn photo_store(mut self, photos: PhotoStore) -> Self {
        self.photos = photos;
        self
    }

    /// Staff bearer token; blank or `None` closes the archive
    #[must_use]
    pub fn staff_token(mut self, token: Option<&str>) -> Self {
        self.staff_token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Arc::from);
        self
    }

    /// Mark the session cookie `Secure`
    #[must_use]
    pub const fn secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Build the container
    #[must_use]
    pub fn build(self) -> StudioResources {
        let conversation = ConversationClient::new(self.provider.clone(), self.assistant.chat);
        let generator = AgreementGenerator::new(self.provider.clone(), self.assistant.generator);
        let flow = AgreementFlow::new(self.database.clone(), conversation, generator, self.photos);

        StudioResources {
            database: self.database,
            flow,
            provider: self.provider,
            staff_token: self.staff_token,
            secure_cookies: self.secure_cookies,
        }
    }
}
