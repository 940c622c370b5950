// ABOUTME: Route module organization and the top-level router
// ABOUTME: Session cookie handling and page error mapping shared by the route groups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Routes
//!
//! - [`FlowRoutes`]: the page steps, GET views and form POSTs answering `303`
//! - [`ApiRoutes`]: `/api/chat/` and `/api/generate/`
//! - [`ArchiveRoutes`]: staff-only exhibition archive
//! - [`HealthRoutes`]: liveness and readiness

/// JSON API used by the reflection page
pub mod api;
/// Staff-only archive
pub mod archive;
/// Page steps of the agreement flow
pub mod flow;
/// Health check routes
pub mod health;

pub use api::ApiRoutes;
pub use archive::ArchiveRoutes;
pub use flow::FlowRoutes;
pub use health::HealthRoutes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Router;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::constants::{defaults, paths, session};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::flow::SessionToken;
use crate::resources::StudioResources;

/// Every route group behind request tracing and the body limit
pub fn router(resources: Arc<StudioResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(FlowRoutes::routes(resources.clone()))
        .merge(ApiRoutes::routes(resources.clone()))
        .merge(ArchiveRoutes::routes(resources))
        .layer(DefaultBodyLimit::max(defaults::MAX_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(defaults::MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}

/// Session token carried by the request
///
/// # Errors
///
/// Returns `SessionMissing` when the cookie is absent or blank
pub(crate) fn session_token(jar: &CookieJar) -> AppResult<SessionToken> {
    jar.get(session::COOKIE_NAME)
        .and_then(|cookie| SessionToken::parse(cookie.value()))
        .ok_or_else(AppError::session_missing)
}

/// Cookie carrying a freshly issued token
pub(crate) fn session_cookie(token: &SessionToken, secure: bool) -> Cookie<'static> {
    Cookie::build((session::COOKIE_NAME, token.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Jar with the session cookie removed
pub(crate) fn end_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((session::COOKIE_NAME, "")).path("/"))
}

/// Error from a page step
///
/// A missing session is not a fault on pages: the browser is sent back to a
/// step it can start from.
#[derive(Debug)]
pub enum PageError {
    /// Send the browser to this path with `303 See Other`
    Redirect(&'static str),
    /// Any other failure, rendered as the JSON error body
    App(AppError),
}

impl PageError {
    /// Same error, but a missing session goes to `path`
    #[must_use]
    pub fn session_missing_to(self, path: &'static str) -> Self {
        match self {
            Self::Redirect(_) => Self::Redirect(path),
            other @ Self::App(_) => other,
        }
    }
}

impl From<AppError> for PageError {
    fn from(error: AppError) -> Self {
        if error.code == ErrorCode::SessionMissing {
            Self::Redirect(paths::SELECT)
        } else {
            Self::App(error)
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(path) => Redirect::to(path).into_response(),
            Self::App(error) => error.into_response(),
        }
    }
}
