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

//! Download handler.

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;
use tracing::info;

use crate::error::ApiError;
use crate::server::AppState;

/// Streams the canonical file back to an authorized client.
///
/// API: GET /download (authorization enforced by middleware)
///
/// # Returns
///
/// - 200 with the full file bytes as `text/csv`
/// - 404 plain text `File not found` when nothing has been uploaded yet
pub async fn download_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let file = state.store.open_reader().await?.ok_or(ApiError::NotFound)?;

    info!("Download: streaming canonical file");

    let body = Body::from_stream(ReaderStream::new(file));
    Ok(([(header::CONTENT_TYPE, "text/csv")], body).into_response())
}
