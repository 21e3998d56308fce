// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::ops::Gallery;
use crate::store::{GalleryLayout, WriteDurability};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub root: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub max_request_bytes: usize,
    pub durability: WriteDurability,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            durability: WriteDurability::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn layout(&self) -> GalleryLayout {
        GalleryLayout::new(self.root.clone())
    }

    pub fn gallery(&self) -> Gallery {
        Gallery::from_layout(&self.layout(), self.durability)
    }
}
