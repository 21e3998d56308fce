// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP surface.
//!
//! | Method | Path                 | Effect                          |
//! |--------|----------------------|---------------------------------|
//! | GET    | `/`                  | latest image                    |
//! | GET    | `/upload`            | upload form                     |
//! | POST   | `/upload`            | store `images` (up to 10)       |
//! | GET    | `/gallery`           | full listing                    |
//! | POST   | `/delete/{filename}` | delete record and file          |
//! | GET    | `/edit/{filename}`   | replace form                    |
//! | POST   | `/edit/{filename}`   | replace with `newImage`         |
//!
//! Everything else is served from the `public/` directory.

pub mod attachments;
pub mod views;

use std::path::PathBuf;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::model::StoredFilename;
use crate::ops::{Gallery, GalleryError};

use attachments::{receive_files, FileField, MAX_UPLOAD_FILES};
use views::{EditView, GalleryView, HtmlTemplate, IndexView, UploadView};

#[derive(Debug, Clone)]
pub struct AppState {
    gallery: Gallery,
}

impl AppState {
    pub fn new(gallery: Gallery) -> Self {
        Self { gallery }
    }
}

/// Builds the application router.
///
/// `max_request_bytes` bounds every request body, which in practice means multipart uploads.
pub fn router(gallery: Gallery, public_dir: impl Into<PathBuf>, max_request_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", get(upload_form).post(upload_submit))
        .route("/gallery", get(gallery_page))
        .route("/delete/{filename}", post(delete_image))
        .route("/edit/{filename}", get(edit_form).post(edit_submit))
        .with_state(AppState::new(gallery))
        .fallback_service(ServeDir::new(public_dir.into()))
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Gallery(#[from] GalleryError),
    #[error("Invalid filename")]
    InvalidFilename,
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Gallery(GalleryError::NoFiles) | Self::InvalidFilename => StatusCode::BAD_REQUEST,
            Self::Gallery(GalleryError::RecordNotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Gallery(GalleryError::Store(_) | GalleryError::RemoveFile { .. })
            | Self::Join(_) => {
                tracing::error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

async fn blocking<T, F>(op: F) -> Result<T, ServerError>
where
    F: FnOnce() -> Result<T, GalleryError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(op).await??)
}

fn parse_filename(raw: &str) -> Result<StoredFilename, ServerError> {
    StoredFilename::new(raw).map_err(|_| ServerError::InvalidFilename)
}

fn upload_form_with_message(msg: String) -> Response {
    let view = UploadView {
        msg: Some(msg),
        max_files: MAX_UPLOAD_FILES,
    };
    (StatusCode::BAD_REQUEST, HtmlTemplate(view)).into_response()
}

async fn index(State(state): State<AppState>) -> Result<Response, ServerError> {
    let gallery = state.gallery.clone();
    let latest = blocking(move || gallery.latest()).await?;
    Ok(HtmlTemplate(IndexView { latest }).into_response())
}

async fn upload_form() -> Response {
    HtmlTemplate(UploadView {
        msg: None,
        max_files: MAX_UPLOAD_FILES,
    })
    .into_response()
}

async fn upload_submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServerError> {
    let files = match receive_files(multipart, state.gallery.uploads(), FileField::IMAGES).await {
        Ok(files) => files,
        Err(err) => return Ok(upload_form_with_message(err.to_string())),
    };

    let gallery = state.gallery.clone();
    match blocking(move || gallery.upload(files)).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(ServerError::Gallery(err @ GalleryError::NoFiles)) => {
            Ok(upload_form_with_message(err.to_string()))
        }
        Err(err) => Err(err),
    }
}

async fn gallery_page(State(state): State<AppState>) -> Result<Response, ServerError> {
    let gallery = state.gallery.clone();
    let images = blocking(move || gallery.records()).await?;
    Ok(HtmlTemplate(GalleryView { images }).into_response())
}

async fn delete_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ServerError> {
    let filename = parse_filename(&filename)?;
    let gallery = state.gallery.clone();
    blocking(move || gallery.delete(&filename)).await?;
    Ok(Redirect::to("/gallery").into_response())
}

async fn edit_form(Path(filename): Path<String>) -> Result<Response, ServerError> {
    let filename = parse_filename(&filename)?;
    Ok(HtmlTemplate(EditView { filename }).into_response())
}

async fn edit_submit(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServerError> {
    let old = parse_filename(&filename)?;

    let mut files =
        match receive_files(multipart, state.gallery.uploads(), FileField::NEW_IMAGE).await {
            Ok(files) => files,
            Err(err) => {
                return Ok((
                    StatusCode::BAD_REQUEST,
                    format!("Error uploading new image: {err}"),
                )
                    .into_response())
            }
        };
    let Some(replacement) = files.pop() else {
        return Ok((StatusCode::BAD_REQUEST, "No file selected").into_response());
    };

    let gallery = state.gallery.clone();
    blocking(move || gallery.replace(&old, replacement)).await?;
    Ok(Redirect::to("/gallery").into_response())
}
