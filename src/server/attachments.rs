// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Multipart file intake.
//!
//! Files are streamed straight into the uploads directory while the request body is parsed.
//! A request that fails part-way leaves nothing behind: every file it already wrote is
//! discarded before the error is returned.

use std::io;

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::Multipart;
use tokio::io::AsyncWriteExt;

use crate::store::{StoredUpload, UploadsDir};

pub const MAX_UPLOAD_FILES: usize = 10;

/// The form field a request may carry files under, and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileField {
    pub name: &'static str,
    pub max_files: usize,
}

impl FileField {
    pub const IMAGES: Self = Self {
        name: "images",
        max_files: MAX_UPLOAD_FILES,
    };

    pub const NEW_IMAGE: Self = Self {
        name: "newImage",
        max_files: 1,
    };
}

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),
    #[error("Too many files: at most {max} per request")]
    TooManyFiles { max: usize },
    #[error("Unsupported file type {content_type:?} for {original_name:?}: only images are accepted")]
    UnsupportedType {
        original_name: String,
        content_type: String,
    },
    #[error("{0}")]
    Multipart(String),
    #[error("cannot store upload: {0}")]
    Io(#[from] io::Error),
}

impl From<MultipartError> for AttachmentError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err.body_text())
    }
}

impl From<MultipartRejection> for AttachmentError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Multipart(rejection.body_text())
    }
}

/// Streams every file under `field` into `uploads`.
///
/// Parts without a client filename (an untouched file input) and plain text fields are
/// skipped. An empty result is not an error here; callers decide what "no files" means.
pub async fn receive_files(
    multipart: Result<Multipart, MultipartRejection>,
    uploads: &UploadsDir,
    field: FileField,
) -> Result<Vec<StoredUpload>, AttachmentError> {
    let mut multipart = multipart?;
    let mut accepted = Vec::new();

    match collect_files(&mut multipart, uploads, field, &mut accepted).await {
        Ok(()) => Ok(accepted),
        Err(err) => {
            for file in &accepted {
                uploads.discard(&file.filename).await;
            }
            tracing::debug!(error = %err, discarded = accepted.len(), "rejected attachments");
            Err(err)
        }
    }
}

async fn collect_files(
    multipart: &mut Multipart,
    uploads: &UploadsDir,
    field: FileField,
    accepted: &mut Vec<StoredUpload>,
) -> Result<(), AttachmentError> {
    while let Some(part) = multipart.next_field().await? {
        let Some(original_name) = part.file_name().filter(|name| !name.is_empty()) else {
            continue;
        };
        let original_name = original_name.to_owned();

        let name = part.name().unwrap_or_default();
        if name != field.name {
            return Err(AttachmentError::UnexpectedField(name.to_owned()));
        }
        if accepted.len() >= field.max_files {
            return Err(AttachmentError::TooManyFiles {
                max: field.max_files,
            });
        }
        if let Some(content_type) = part.content_type() {
            if !content_type.starts_with("image/") {
                return Err(AttachmentError::UnsupportedType {
                    original_name,
                    content_type: content_type.to_owned(),
                });
            }
        }

        accepted.push(write_part(part, uploads, original_name).await?);
    }
    Ok(())
}

async fn write_part(
    mut part: Field<'_>,
    uploads: &UploadsDir,
    original_name: String,
) -> Result<StoredUpload, AttachmentError> {
    let (filename, mut file) = uploads.create(&original_name).await?;

    let written = async {
        let mut size = 0u64;
        while let Some(chunk) = part.chunk().await? {
            file.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }
        file.flush().await?;
        Ok::<_, AttachmentError>(size)
    }
    .await;
    drop(file);

    match written {
        Ok(size) => Ok(StoredUpload {
            filename,
            original_name,
            size,
        }),
        Err(err) => {
            uploads.discard(&filename).await;
            Err(err)
        }
    }
}
