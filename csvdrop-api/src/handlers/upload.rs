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

//! Upload handler.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::server::AppState;

/// Accepts a new CSV upload and makes it the canonical file.
///
/// API: POST /upload (multipart/form-data, one file field)
///
/// The prior canonical file, if any, is archived as a timestamped backup
/// and the backup set is pruned before the new content is written. The
/// payload is stored verbatim; nothing validates that it is well-formed CSV.
///
/// # Returns
///
/// - 200 `{"success":true}` on success
/// - 400 `{"error":"No file uploaded"}` when the file field is missing or empty
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let bytes = extract_file_field(&mut multipart).await?;
    if bytes.is_empty() {
        debug!("Upload: file field present but empty");
        return Err(ApiError::NoFileUploaded);
    }

    info!("Upload: size={}", bytes.len());

    // Decode-then-reencode mirrors the reference behavior of treating the
    // payload as text; invalid UTF-8 sequences are replaced, not rejected.
    let text = String::from_utf8_lossy(&bytes).into_owned();

    state.store.replace(text.as_bytes()).await?;

    Ok(Json(json!({ "success": true })))
}

/// Pulls the uploaded file's bytes out of the multipart body.
///
/// The first field carrying a filename (or explicitly named `file`) wins.
/// A body with no such field, or one that cannot be parsed at all, counts
/// as "no file uploaded".
async fn extract_file_field(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::NoFileUploaded)?
    {
        let is_file = field.file_name().is_some() || field.name() == Some("file");
        if is_file {
            return field.bytes().await.map_err(|_| ApiError::NoFileUploaded);
        }
    }

    debug!("Upload: no file field found in multipart body");
    Err(ApiError::NoFileUploaded)
}
