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

//! Error types for the artifact store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the artifact store.
///
/// Storage failures are deliberately coarse: disk-full, permission and path
/// errors all surface as [`StoreError::Io`] and are terminal for the request
/// that triggered them. No retry happens anywhere in this crate.
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO error occurred during rotation, write or read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured backup path exists but is not a directory.
    #[error("Backup path is not a directory: {path}")]
    InvalidBackupDir {
        /// Path that was expected to be a directory.
        path: PathBuf,
    },
}
