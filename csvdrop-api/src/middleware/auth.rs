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

//! Download authorization middleware.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ApiError;
use crate::server::AppState;

/// Middleware that gates the download route behind a static bearer token.
///
/// The `Authorization` header must exactly equal `Bearer <token>`:
/// case-sensitive, no trimming, no scheme variants. Anything else, including
/// an absent header, is rejected with 403 before any storage access.
pub async fn require_download_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let expected = format!("Bearer {}", state.download_token);

    match presented {
        Some(value) if value == expected => next.run(request).await,
        _ => {
            warn!("download rejected: missing or invalid bearer token");
            ApiError::InvalidToken.into_response()
        }
    }
}
