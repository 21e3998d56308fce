// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Galleria CLI entrypoint.
//!
//! Bootstraps the application root (`data.json`, `public/css/`, `public/uploads/`) and serves
//! the gallery over HTTP at `http://<host>:<port>/`.

use std::error::Error;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use galleria::config::{ServerConfig, DEFAULT_HOST, DEFAULT_MAX_REQUEST_BYTES, DEFAULT_PORT};
use galleria::store::WriteDurability;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "galleria", version, about = "Server-rendered image gallery")]
struct Cli {
    /// Application root holding `data.json` and `public/`.
    #[arg(default_value = ".")]
    root: PathBuf,

    #[arg(long, default_value_t = DEFAULT_HOST)]
    host: IpAddr,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Upper bound for a request body, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_REQUEST_BYTES)]
    max_request_bytes: usize,

    /// Opt into slower, best-effort durable metadata writes (fsync/sync where supported).
    #[arg(long)]
    durable_writes: bool,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            root: self.root,
            host: self.host,
            port: self.port,
            max_request_bytes: self.max_request_bytes,
            durability: if self.durable_writes {
                WriteDurability::Durable
            } else {
                WriteDurability::BestEffort
            },
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("galleria=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn main() {
    let config = Cli::parse().into_config();
    init_tracing();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let layout = config.layout();
        layout.ensure()?;
        let gallery = config.gallery();
        let router = galleria::server::router(gallery, layout.public_dir(), config.max_request_bytes);

        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
            tracing::info!(
                addr = %listener.local_addr()?,
                root = ?layout.root(),
                "galleria running"
            );
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("galleria: {err}");
        std::process::exit(1);
    }
}
