// ABOUTME: Staff-only exhibition archive of completed agreements
// ABOUTME: Guarded by a bearer token compared in constant time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use subtle::ConstantTimeEq;

use crate::constants::paths;
use crate::errors::{AppError, AppResult};
use crate::flow::views::ArchiveItem;
use crate::logging::AppLogger;
use crate::resources::StudioResources;

/// Archive routes
pub struct ArchiveRoutes;

impl ArchiveRoutes {
    /// Create the archive routes
    pub fn routes(resources: Arc<StudioResources>) -> Router {
        Router::new()
            .route(paths::ARCHIVE, get(Self::list))
            .route(paths::ARCHIVE_ENTRY, get(Self::entry))
            .with_state(resources)
    }

    /// Completed, archived agreements, newest first
    async fn list(
        State(resources): State<Arc<StudioResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        require_staff(&resources, &headers, paths::ARCHIVE)?;
        let view = resources.flow.archive().await?;
        Ok(Json(view).into_response())
    }

    /// Any agreement by ID, archived or not
    async fn entry(
        State(resources): State<Arc<StudioResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        require_staff(&resources, &headers, paths::ARCHIVE_ENTRY)?;
        let entry = resources.flow.archive_entry(id).await?;
        Ok(Json(ArchiveItem::from(entry)).into_response())
    }
}

/// Check the staff bearer token
///
/// # Errors
///
/// Returns `AuthRequired` without a usable bearer token, or
/// `PermissionDenied` for a wrong token or when no staff token is configured
fn require_staff(resources: &StudioResources, headers: &HeaderMap, path: &str) -> AppResult<()> {
    let Some(expected) = resources.staff_token.as_deref() else {
        AppLogger::log_staff_access_denied(path, "no staff token configured");
        return Err(AppError::permission_denied("Archive is closed"));
    };

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token);
    let Some(presented) = presented else {
        AppLogger::log_staff_access_denied(path, "missing bearer token");
        return Err(AppError::auth_required());
    };

    if bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        AppLogger::log_staff_access_denied(path, "token mismatch");
        Err(AppError::permission_denied("Invalid staff token"))
    }
}

/// Token from an `Authorization: Bearer <token>` value
fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
