// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};

use super::metadata::{MetadataStore, StoreError};
use super::uploads::UploadsDir;

const DATA_FILENAME: &str = "data.json";
const PUBLIC_DIRNAME: &str = "public";
const CSS_DIRNAME: &str = "css";
const UPLOADS_DIRNAME: &str = "uploads";

/// On-disk layout of an application root:
///
/// ```text
/// <root>/data.json
/// <root>/public/css/
/// <root>/public/uploads/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryLayout {
    root: PathBuf,
}

impl GalleryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root.join(PUBLIC_DIRNAME)
    }

    pub fn css_dir(&self) -> PathBuf {
        self.public_dir().join(CSS_DIRNAME)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir().join(UPLOADS_DIRNAME)
    }

    /// Creates whatever is missing; existing files and directories are left alone.
    pub fn ensure(&self) -> Result<(), StoreError> {
        for dir in [self.css_dir(), self.uploads_dir()] {
            fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir, source })?;
        }

        if MetadataStore::new(self.data_path()).init_if_missing()? {
            tracing::info!(path = ?self.data_path(), "initialized empty gallery");
        }
        Ok(())
    }

    pub fn metadata_store(&self) -> MetadataStore {
        MetadataStore::new(self.data_path())
    }

    pub fn uploads(&self) -> UploadsDir {
        UploadsDir::new(self.uploads_dir())
    }
}
