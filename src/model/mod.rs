// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Gallery data model.
//!
//! A gallery is an ordered list of [`ImageRecord`]s, one per uploaded file.

pub mod filename;
pub mod record;

pub use filename::{FilenameError, StoredFilename};
pub use record::{public_path, ImageRecord, UPLOADS_URL_PREFIX};
