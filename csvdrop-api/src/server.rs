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

//! Axum router setup and shared application state.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use csvdrop_core::ArtifactStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::require_download_token;

/// Default maximum upload size (50MB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Artifact store instance.
    pub store: Arc<ArtifactStore>,
    /// Pre-shared secret required to download the canonical file.
    pub download_token: String,
    /// Maximum accepted upload body size in bytes.
    pub max_upload_size: usize,
}

impl AppState {
    /// Creates application state with the default upload size limit.
    pub fn new(store: Arc<ArtifactStore>, download_token: String) -> Self {
        Self::with_max_upload_size(store, download_token, DEFAULT_MAX_UPLOAD_SIZE)
    }

    /// Creates application state with an explicit upload size limit.
    pub fn with_max_upload_size(
        store: Arc<ArtifactStore>,
        download_token: String,
        max_upload_size: usize,
    ) -> Self {
        Self { store, download_token, max_upload_size }
    }
}

/// Creates the application router.
///
/// `/download` sits behind the bearer-token middleware; `/upload` is open.
/// A permissive CORS layer covers both routes for browser-based clients.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    let download_routes = Router::new()
        .route("/download", get(handlers::download::download_csv))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_download_token,
        ));

    Router::new()
        .route("/upload", post(handlers::upload::upload_csv))
        .merge(download_routes)
        .layer(DefaultBodyLimit::max(state.max_upload_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
