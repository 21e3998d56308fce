// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The name of a file inside the uploads directory.
///
/// Stored filenames arrive from the metadata document and from URL path segments, and are
/// joined onto the uploads directory before touching disk. The only enforced shape is that the
/// name is a single, non-reserved *path segment*, so a joined path can never leave that
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoredFilename {
    value: String,
}

impl StoredFilename {
    pub fn new(value: impl Into<String>) -> Result<Self, FilenameError> {
        let value = value.into();
        validate_filename_segment(&value)?;
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// The name as one percent-encoded URL path segment.
    ///
    /// Every byte outside the RFC 3986 unreserved set is escaped.
    pub fn url_segment(&self) -> String {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";
        let mut out = String::with_capacity(self.value.len());
        for &byte in self.value.as_bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
                out.push(char::from(byte));
            } else {
                out.push('%');
                out.push(char::from(HEX[usize::from(byte >> 4)]));
                out.push(char::from(HEX[usize::from(byte & 0x0f)]));
            }
        }
        out
    }
}

impl fmt::Display for StoredFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for StoredFilename {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for StoredFilename {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for StoredFilename {
    type Err = FilenameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for StoredFilename {
    type Error = FilenameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StoredFilename> for String {
    fn from(value: StoredFilename) -> Self {
        value.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    #[error("filename must not be empty")]
    Empty,
    #[error("filename must not contain '/' or '\\'")]
    ContainsSeparator,
    #[error("filename must not be '.' or '..'")]
    Reserved,
    #[error("filename must not contain control characters")]
    ControlCharacter,
}

fn validate_filename_segment(value: &str) -> Result<(), FilenameError> {
    if value.is_empty() {
        return Err(FilenameError::Empty);
    }
    if value.contains(['/', '\\']) {
        return Err(FilenameError::ContainsSeparator);
    }
    if value == "." || value == ".." {
        return Err(FilenameError::Reserved);
    }
    if value.chars().any(char::is_control) {
        return Err(FilenameError::ControlCharacter);
    }
    Ok(())
}
