// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence on disk.
//!
//! The store module owns the metadata document (`data.json`), the uploads directory, and the
//! application root layout that ties them together.

pub mod layout;
pub mod metadata;
pub mod uploads;

pub use layout::GalleryLayout;
pub use metadata::{MetadataStore, StoreError, WriteDurability};
pub use uploads::{extension_of, StoredUpload, UploadsDir};
