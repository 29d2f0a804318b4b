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

//! Backup rotation and retention.
//!
//! Before each canonical write, the current canonical file (if any) is
//! renamed into the backup directory under a timestamped name, then the
//! directory is pruned down to the retention bound, oldest entries first.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, info};

use crate::error::StoreError;

/// Default number of archived versions kept after pruning.
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// Archives superseded canonical files and enforces the retention bound.
///
/// The rotator is the only component that creates or deletes entries in the
/// backup directory. The retention bound counts archived entries only, never
/// the live canonical file: pruning runs after the rename and before the
/// caller writes the new canonical content.
#[derive(Debug)]
pub struct BackupRotator {
    backup_dir: PathBuf,
    max_backups: usize,
}

impl BackupRotator {
    /// Creates a rotator over `backup_dir`, retaining at most `max_backups`
    /// archived versions.
    pub fn new(backup_dir: impl Into<PathBuf>, max_backups: usize) -> Self {
        Self { backup_dir: backup_dir.into(), max_backups }
    }

    /// Path of the backup directory this rotator owns.
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Archives `target` into the backup directory and prunes old entries.
    ///
    /// No-op when `target` does not exist (first upload ever). Otherwise the
    /// canonical file is renamed away, so it does not exist again until the
    /// caller writes the new content; a listing failure here leaves the
    /// store with no canonical file. Two rotations within the same
    /// millisecond produce the same backup name and the later rename
    /// overwrites the earlier entry.
    pub async fn rotate(&self, target: &Path) -> Result<(), StoreError> {
        if fs::metadata(target).await.is_err() {
            debug!("rotate: no canonical file at {:?}, nothing to archive", target);
            return Ok(());
        }

        let backup_path = self.backup_dir.join(backup_file_name(Utc::now()));
        fs::rename(target, &backup_path).await?;
        info!("rotate: archived {:?} as {:?}", target, backup_path);

        self.prune().await
    }

    /// Deletes the oldest backups until at most `max_backups` remain.
    async fn prune(&self) -> Result<(), StoreError> {
        let mut backups = self.list().await?;
        while backups.len() > self.max_backups {
            // list() is newest-first, so the last entry is the oldest.
            let Some((oldest, _)) = backups.pop() else { break };
            fs::remove_file(&oldest).await?;
            info!("rotate: pruned oldest backup {:?}", oldest);
        }
        Ok(())
    }

    /// Lists backup files sorted by modification time, newest first.
    ///
    /// Equal modification times are broken by file name so the order is
    /// deterministic within a process run.
    pub async fn list(&self) -> Result<Vec<(PathBuf, SystemTime)>, StoreError> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.backup_dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if metadata.is_file() {
                entries.push((entry.path(), metadata.modified()?));
            }
        }
        entries.sort_by(|(a_path, a_mtime), (b_path, b_mtime)| {
            b_mtime.cmp(a_mtime).then_with(|| b_path.cmp(a_path))
        });
        Ok(entries)
    }
}

/// Formats a backup file name for the given instant.
///
/// The timestamp is ISO-8601 with colons and periods replaced by hyphens so
/// the name is filesystem-safe, e.g. `backup-2026-08-25T12-34-56-789Z.csv`.
fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("backup-{}.csv", now.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}
