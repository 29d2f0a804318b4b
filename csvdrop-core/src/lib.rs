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

//! Csvdrop Core - Canonical artifact storage and backup rotation.
//!
//! This crate owns the on-disk state of the service:
//! - A single canonical file (`target.csv`) holding the most recent upload
//! - A `backups/` directory holding a bounded set of superseded versions
//!
//! No HTTP concerns live here; the API layer injects an [`ArtifactStore`]
//! into its handlers.

pub mod error;
pub mod rotate;
pub mod store;

pub use error::StoreError;
pub use rotate::{BackupRotator, DEFAULT_MAX_BACKUPS};
pub use store::{ArtifactStore, BACKUP_DIR_NAME, TARGET_FILE_NAME};
