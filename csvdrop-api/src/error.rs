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

//! API error types and responses.
//!
//! Validation and authorization failures carry structured JSON bodies;
//! a missing canonical file answers with plain text. Storage failures are
//! collapsed into a generic 500 without detail leaking to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use csvdrop_core::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The upload carried no file field, or the field was empty.
    #[error("No file uploaded")]
    NoFileUploaded,

    /// The download request carried a missing or wrong bearer token.
    #[error("Invalid token")]
    InvalidToken,

    /// No canonical file has ever been uploaded.
    #[error("File not found")]
    NotFound,

    /// Storage-layer failure during rotation, write or read.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFileUploaded => StatusCode::BAD_REQUEST,
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // Plain text, matching the reference behavior for a missing file.
            ApiError::NotFound => (status, "File not found").into_response(),
            ApiError::Store(e) => {
                error!("storage failure: {}", e);
                (status, Json(json!({ "error": "Internal server error" }))).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
