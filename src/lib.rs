// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Galleria: a server-rendered image gallery.
//!
//! Uploaded images live in `public/uploads/`; their metadata lives in one JSON array document
//! (`data.json`) that every operation reads and rewrites in full.

pub mod config;
pub mod model;
pub mod ops;
pub mod server;
pub mod store;
