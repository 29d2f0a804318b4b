// Copyright 2026 Csvdrop Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application initialization and runtime.
//!
//! This module handles:
//! - Artifact store initialization
//! - HTTP server setup
//! - Graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use csvdrop_api::{create_router, AppState};
use csvdrop_core::ArtifactStore;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;

/// Main application.
pub struct App {
    config: Config,
    store: Arc<ArtifactStore>,
}

impl App {
    /// Creates a new application instance.
    ///
    /// Opens the artifact store, creating the data and backup directories
    /// if they do not exist.
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing csvdrop application...");

        let store = ArtifactStore::open(
            config.storage.data_dir.clone(),
            config.storage.max_backups,
        )
        .await?;

        info!("Artifact store initialized successfully");

        Ok(Self { config, store: Arc::new(store) })
    }

    /// Runs the HTTP server until a shutdown signal arrives.
    pub async fn run(self) -> Result<()> {
        info!("Data directory: {:?}", self.config.storage.data_dir);
        info!("Backup retention: {}", self.config.storage.max_backups);
        info!(
            "Max upload size: {} bytes ({:.2} MB)",
            self.config.server.max_upload_size,
            self.config.server.max_upload_size as f64 / (1024.0 * 1024.0)
        );

        // Use chars() to safely handle multi-byte UTF-8 characters
        let token_preview: String =
            self.config.security.download_token.chars().take(4).collect();
        info!("Download token: {}...", token_preview);

        let addr: SocketAddr = self.config.server.bind.parse()?;

        let state = AppState::with_max_upload_size(
            self.store,
            self.config.security.download_token.clone(),
            self.config.server.max_upload_size,
        );
        let router = create_router(state);

        let listener = TcpListener::bind(addr).await?;
        info!("Listening on http://{}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server shutdown complete");
        Ok(())
    }
}

/// Handles graceful shutdown signals.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown...");
        }
    }
}
