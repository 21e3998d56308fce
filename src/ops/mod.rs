// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Gallery operations: upload, delete, replace, and listing.
//!
//! Each mutation loads the whole metadata document, edits it in memory, and saves it back.
//! Mutations sharing one [`Gallery`] (and its clones) run one at a time, so concurrent requests
//! inside a process cannot drop each other's updates. Separate processes writing the same
//! document are still last-writer-wins.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::model::{ImageRecord, StoredFilename};
use crate::store::{
    GalleryLayout, MetadataStore, StoreError, StoredUpload, UploadsDir, WriteDurability,
};

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("No files uploaded!")]
    NoFiles,
    #[error("Image not found")]
    RecordNotFound { filename: StoredFilename },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cannot remove {path:?}: {source}")]
    RemoveFile { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed_records: usize,
    pub removed_file: bool,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    store: MetadataStore,
    uploads: UploadsDir,
    writer: Arc<Mutex<()>>,
}

impl Gallery {
    pub fn new(store: MetadataStore, uploads: UploadsDir) -> Self {
        Self {
            store,
            uploads,
            writer: Arc::new(Mutex::new(())),
        }
    }

    pub fn from_layout(layout: &GalleryLayout, durability: WriteDurability) -> Self {
        Self::new(
            layout.metadata_store().with_durability(durability),
            layout.uploads(),
        )
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn uploads(&self) -> &UploadsDir {
        &self.uploads
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        // Nothing lives behind the lock, so poisoning carries no state.
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn records(&self) -> Result<Vec<ImageRecord>, GalleryError> {
        Ok(self.store.load()?)
    }

    pub fn latest(&self) -> Result<Option<ImageRecord>, GalleryError> {
        Ok(self.store.load()?.pop())
    }

    /// Records files that are already in the uploads directory, in the given order.
    pub fn upload(&self, files: Vec<StoredUpload>) -> Result<Vec<ImageRecord>, GalleryError> {
        if files.is_empty() {
            return Err(GalleryError::NoFiles);
        }

        let bytes = files.iter().map(|file| file.size).sum::<u64>();
        let _writer = self.lock_writer();
        let mut records = self.store.load()?;
        let added = files
            .into_iter()
            .map(|file| {
                tracing::debug!(
                    filename = %file.filename,
                    original = %file.original_name,
                    size = file.size,
                    "recording upload"
                );
                ImageRecord::new(file.filename, Utc::now())
            })
            .collect::<Vec<_>>();
        records.extend(added.iter().cloned());
        self.store.save(&records)?;

        tracing::info!(
            count = added.len(),
            bytes,
            total = records.len(),
            "uploaded images"
        );
        Ok(added)
    }

    /// Drops the record for `filename` and its backing file.
    ///
    /// Neither a missing record nor a missing file is an error; the document is rewritten in
    /// both cases.
    pub fn delete(&self, filename: &StoredFilename) -> Result<DeleteOutcome, GalleryError> {
        let _writer = self.lock_writer();
        let records = self.store.load()?;
        let before = records.len();
        let kept = records
            .into_iter()
            .filter(|record| record.filename() != filename)
            .collect::<Vec<_>>();

        let removed_file = self.remove_backing_file(filename)?;
        self.store.save(&kept)?;

        let outcome = DeleteOutcome {
            removed_records: before - kept.len(),
            removed_file,
        };
        tracing::info!(
            filename = %filename,
            removed_records = outcome.removed_records,
            removed_file = outcome.removed_file,
            "deleted image"
        );
        Ok(outcome)
    }

    /// Points the record for `old` at an already stored replacement file.
    ///
    /// When no record matches, the replacement stays in the uploads directory unrecorded.
    pub fn replace(
        &self,
        old: &StoredFilename,
        replacement: StoredUpload,
    ) -> Result<ImageRecord, GalleryError> {
        let _writer = self.lock_writer();
        let mut records = self.store.load()?;
        let Some(index) = records.iter().position(|record| record.filename() == old) else {
            tracing::warn!(
                filename = %old,
                orphan = %replacement.filename,
                "replace target not found; replacement file left unrecorded"
            );
            return Err(GalleryError::RecordNotFound {
                filename: old.clone(),
            });
        };

        self.remove_backing_file(old)?;
        records[index].replace_file(replacement.filename);
        self.store.save(&records)?;

        let updated = records[index].clone();
        tracing::info!(old = %old, new = %updated.filename(), "replaced image");
        Ok(updated)
    }

    fn remove_backing_file(&self, filename: &StoredFilename) -> Result<bool, GalleryError> {
        self.uploads
            .remove_if_exists(filename)
            .map_err(|source| GalleryError::RemoveFile {
                path: self.uploads.file_path(filename),
                source,
            })
    }
}

#[cfg(test)]
mod tests;
