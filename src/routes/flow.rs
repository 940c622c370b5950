// ABOUTME: Page routes for the agreement steps from type selection to completion
// ABOUTME: GETs return JSON views; form POSTs advance the flow and answer 303 See Other
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use super::{end_session, session_cookie, session_token, PageError};
use crate::constants::{paths, service_names};
use crate::errors::{AppError, AppResult};
use crate::flow::{CompleteOutcome, PhotoOutcome};
use crate::photos::PhotoPayload;
use crate::resources::StudioResources;

/// Type selection form
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    /// Chosen agreement type ID
    pub agreement_type: i64,
    /// Names of the people entering the agreement
    #[serde(default)]
    pub participants: Option<String>,
}

/// Review form
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    /// Edited agreement text, stored verbatim
    #[serde(default)]
    pub agreement_text: String,
}

/// URL-encoded photo form carrying a camera capture
#[derive(Debug, Deserialize)]
pub struct PhotoForm {
    /// `data:<mime>;base64,<bytes>`
    #[serde(default)]
    pub photo_data: String,
}

/// Flow page routes
pub struct FlowRoutes;

impl FlowRoutes {
    /// Create all page routes
    pub fn routes(resources: Arc<StudioResources>) -> Router {
        Router::new()
            .route(paths::LANDING, get(Self::landing))
            .route(paths::SELECT, get(Self::select_page).post(Self::select_type))
            .route(paths::REFLECTION, get(Self::reflection))
            .route(paths::REVIEW, get(Self::review).post(Self::submit_review))
            .route(paths::PRINT, get(Self::print).post(Self::confirm_print))
            .route(paths::PHOTO, get(Self::photo).post(Self::submit_photo))
            .route(paths::COMPLETE, get(Self::complete))
            .with_state(resources)
    }

    async fn landing() -> Json<serde_json::Value> {
        Json(json!({
            "service": service_names::AGREEMENT_STUDIO,
            "start": paths::SELECT,
        }))
    }

    async fn select_page(
        State(resources): State<Arc<StudioResources>>,
    ) -> Result<Response, PageError> {
        let view = resources.flow.select_page().await?;
        Ok(Json(view).into_response())
    }

    async fn select_type(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
        Form(form): Form<SelectForm>,
    ) -> Result<Response, PageError> {
        let (token, _) = resources
            .flow
            .select_type(form.agreement_type, form.participants.as_deref())
            .await?;

        let jar = jar.add(session_cookie(&token, resources.secure_cookies));
        Ok((jar, Redirect::to(paths::REFLECTION)).into_response())
    }

    async fn reflection(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
    ) -> Result<Response, PageError> {
        let token = session_token(&jar)?;
        let view = resources.flow.reflection(&token).await?;
        Ok(Json(view).into_response())
    }

    async fn review(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
    ) -> Result<Response, PageError> {
        let token = session_token(&jar)?;
        let view = resources.flow.review(&token).await?;
        Ok(Json(view).into_response())
    }

    async fn submit_review(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
        Form(form): Form<ReviewForm>,
    ) -> Result<Response, PageError> {
        let token = session_token(&jar)?;
        resources
            .flow
            .submit_review(&token, &form.agreement_text)
            .await?;
        Ok(Redirect::to(paths::PRINT).into_response())
    }

    async fn print(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
    ) -> Result<Response, PageError> {
        let token = session_token(&jar)?;
        let view = resources.flow.print(&token).await?;
        Ok(Json(view).into_response())
    }

    async fn confirm_print(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
    ) -> Result<Response, PageError> {
        let token = session_token(&jar)?;
        resources.flow.confirm_print(&token).await?;
        Ok(Redirect::to(paths::PHOTO).into_response())
    }

    async fn photo(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
    ) -> Result<Response, PageError> {
        let token = session_token(&jar)?;
        let view = resources.flow.photo(&token).await?;
        Ok(Json(view).into_response())
    }

    /// Accepts `multipart/form-data` (file field `photo` or text field
    /// `photo_data`) or a URL-encoded `photo_data` form
    async fn submit_photo(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
        request: Request,
    ) -> Result<Response, PageError> {
        let token = session_token(&jar)?;
        let payload = read_photo_payload(request).await?;

        match resources.flow.submit_photo(&token, payload).await? {
            PhotoOutcome::Completed(_) => Ok(Redirect::to(paths::COMPLETE).into_response()),
            PhotoOutcome::Rejected(view) => {
                Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
            }
        }
    }

    async fn complete(
        State(resources): State<Arc<StudioResources>>,
        jar: CookieJar,
    ) -> Result<Response, PageError> {
        let to_landing = |e: AppError| PageError::from(e).session_missing_to(paths::LANDING);

        let token = session_token(&jar).map_err(to_landing)?;
        let outcome = resources.flow.complete(&token).await.map_err(to_landing)?;

        match outcome {
            CompleteOutcome::Finished(view) => Ok((end_session(jar), Json(view)).into_response()),
            CompleteOutcome::Resume(path) => Ok(Redirect::to(path).into_response()),
        }
    }
}

async fn read_photo_payload(request: Request) -> AppResult<Option<PhotoPayload>> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::invalid_format(e.body_text()))?;
        return read_multipart(multipart).await;
    }

    let Form(form) = Form::<PhotoForm>::from_request(request, &())
        .await
        .map_err(|e| AppError::invalid_format(e.body_text()))?;
    Ok((!form.photo_data.trim().is_empty()).then(|| PhotoPayload::DataUrl(form.photo_data)))
}

/// Camera data takes precedence over a file upload; empty fields count as absent
async fn read_multipart(mut multipart: Multipart) -> AppResult<Option<PhotoPayload>> {
    let mut data_url = None;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_format(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("photo_data") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::invalid_format(format!("Unreadable photo_data: {e}")))?;
                if !text.trim().is_empty() {
                    data_url = Some(text);
                }
            }
            Some("photo") => {
                let file_name = field.file_name().map(ToOwned::to_owned);
                let content_type = field.content_type().map(ToOwned::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::invalid_format(format!("Unreadable photo: {e}")))?;
                if !bytes.is_empty() {
                    upload = Some(PhotoPayload::Upload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(data_url.map(PhotoPayload::DataUrl).or(upload))
}
