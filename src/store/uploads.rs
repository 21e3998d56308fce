// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::StoredFilename;

const MAX_EXTENSION_LEN: usize = 16;
const MAX_CREATE_ATTEMPTS: usize = 64;

/// A file written into the uploads directory that has not necessarily been recorded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: StoredFilename,
    pub original_name: String,
    pub size: u64,
}

/// Hands out strictly increasing millisecond stamps.
///
/// Wall-clock millis are used while they move forward; two requests in the same millisecond
/// (or a clock step backwards) get `last + 1` instead.
#[derive(Debug, Default)]
struct StampClock {
    last: AtomicU64,
}

impl StampClock {
    fn next(&self) -> u64 {
        let now = now_millis();
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        now.max(prev.saturating_add(1))
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The directory holding uploaded image files, named `<millis><extension>`.
#[derive(Debug, Clone)]
pub struct UploadsDir {
    dir: PathBuf,
    stamps: Arc<StampClock>,
}

impl UploadsDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stamps: Arc::new(StampClock::default()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self, filename: &StoredFilename) -> PathBuf {
        self.dir.join(filename.as_str())
    }

    pub fn contains(&self, filename: &StoredFilename) -> bool {
        self.file_path(filename).is_file()
    }

    fn next_filename(&self, extension: &str) -> Result<StoredFilename, io::Error> {
        let mut stamp = itoa::Buffer::new();
        let name = format!("{}{extension}", stamp.format(self.stamps.next()));
        StoredFilename::new(name).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
    }

    /// Opens a fresh file for a streamed upload.
    ///
    /// The file is created with create-new semantics; on a name collision the next stamp is
    /// tried.
    pub async fn create(
        &self,
        original_name: &str,
    ) -> Result<(StoredFilename, tokio::fs::File), io::Error> {
        let extension = extension_of(original_name);
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let filename = self.next_filename(&extension)?;
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.file_path(&filename))
                .await
            {
                Ok(file) => return Ok((filename, file)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err),
            }
        }
        Err(collision_error(&self.dir))
    }

    /// Writes a complete upload in one go.
    pub fn store_bytes(
        &self,
        original_name: &str,
        contents: &[u8],
    ) -> Result<StoredUpload, io::Error> {
        let extension = extension_of(original_name);
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let filename = self.next_filename(&extension)?;
            let path = self.file_path(&filename);
            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(file) => file,
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err),
            };
            if let Err(err) = file.write_all(contents) {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(err);
            }
            return Ok(StoredUpload {
                filename,
                original_name: original_name.to_owned(),
                size: contents.len() as u64,
            });
        }
        Err(collision_error(&self.dir))
    }

    /// Removes a file written during a rejected request.
    pub async fn discard(&self, filename: &StoredFilename) {
        match tokio::fs::remove_file(self.file_path(filename)).await {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(filename = %filename, error = %err, "cannot discard rejected upload");
            }
        }
    }

    /// Removes a backing file; `Ok(false)` when it was already gone.
    pub fn remove_if_exists(&self, filename: &StoredFilename) -> Result<bool, io::Error> {
        match fs::remove_file(self.file_path(filename)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}

fn collision_error(dir: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("cannot find a free upload filename in {dir:?}"),
    )
}

/// The `.ext` suffix of a client filename, or `""` when it has none worth keeping.
pub fn extension_of(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    match base.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.bytes().all(|b| b.is_ascii_alphanumeric()) =>
        {
            format!(".{ext}")
        }
        _ => String::new(),
    }
}
