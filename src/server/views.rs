// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::model::{ImageRecord, StoredFilename};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexView {
    pub latest: Option<ImageRecord>,
}

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadView {
    pub msg: Option<String>,
    pub max_files: usize,
}

#[derive(Template)]
#[template(path = "gallery.html")]
pub struct GalleryView {
    pub images: Vec<ImageRecord>,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditView {
    pub filename: StoredFilename,
}

pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "template render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template: {err}"),
                )
                    .into_response()
            }
        }
    }
}
