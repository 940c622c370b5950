// ABOUTME: JSON API used from the reflection page
// ABOUTME: Chat turn exchange and the generate trigger that moves the agreement to review
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! API routes for the reflection step
//!
//! `/api/chat/` is a JSON endpoint: a missing session is a `400` error body.
//! `/api/generate/` is reached by navigation, so it redirects like a page.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

use super::{session_token, PageError};
use crate::constants::paths;
use crate::errors::AppError;
use crate::resources::StudioResources;

/// Chat message from a participant
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    /// Message text
    #[serde(default)]
    pub message: String,
}

/// API routes
pub struct ApiRoutes;

impl ApiRoutes {
    /// Create the API routes
    pub fn routes(resources: Arc<StudioResources>) -> Router {
        Router::new()
            .route(paths::API_CHAT, post(Self::chat))
            .route(paths::API_GENERATE, get(Self::generate).post(Self::generate))
            .with_state(resources)
    }

    /// Append the message and the assistant's reply
    async fn chat(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
        Json(request): Json<ChatMessageRequest>,
    ) -> Result<Response, AppError> {
        let token = session_token(&jar)?;
        let reply = resources.flow.chat(&token, &request.message).await?;
        Ok((StatusCode::OK, Json(reply)).into_response())
    }

    /// Generate the agreement text and continue at review
    async fn generate(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
    ) -> Result<Response, PageError> {
        let token = session_token(&jar)?;
        let agreement = resources.flow.generate(&token).await?;
        info!(
            agreement.id = agreement.id,
            status = %agreement.status,
            "Agreement ready for review"
        );
        Ok(Redirect::to(paths::REVIEW).into_response())
    }
}
