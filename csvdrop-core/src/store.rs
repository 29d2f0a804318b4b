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

//! The canonical artifact store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::StoreError;
use crate::rotate::BackupRotator;

/// File name of the canonical artifact inside the data directory.
pub const TARGET_FILE_NAME: &str = "target.csv";

/// Name of the backup directory inside the data directory.
pub const BACKUP_DIR_NAME: &str = "backups";

/// Owns the canonical artifact on disk and its backup set.
///
/// Replacements are serialized behind a single mutex so the rotate-then-write
/// sequence of one upload can never interleave with another's. Reads take no
/// lock.
#[derive(Debug)]
pub struct ArtifactStore {
    target: PathBuf,
    rotator: BackupRotator,
    write_lock: Mutex<()>,
}

impl ArtifactStore {
    /// Opens a store rooted at `data_dir`, creating the backup directory if
    /// it does not exist.
    ///
    /// The canonical file lives at `<data_dir>/target.csv` and backups under
    /// `<data_dir>/backups/`.
    pub async fn open(
        data_dir: impl Into<PathBuf>,
        max_backups: usize,
    ) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let backup_dir = data_dir.join(BACKUP_DIR_NAME);

        fs::create_dir_all(&data_dir).await?;
        match fs::metadata(&backup_dir).await {
            Ok(metadata) if !metadata.is_dir() => {
                return Err(StoreError::InvalidBackupDir { path: backup_dir });
            }
            Ok(_) => {}
            Err(_) => fs::create_dir_all(&backup_dir).await?,
        }

        info!("artifact store opened at {:?}", data_dir);

        Ok(Self {
            target: data_dir.join(TARGET_FILE_NAME),
            rotator: BackupRotator::new(backup_dir, max_backups),
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the canonical artifact.
    pub fn target_path(&self) -> &Path {
        &self.target
    }

    /// Returns true iff the canonical artifact currently exists.
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.target).await.is_ok()
    }

    /// Archives the current canonical artifact (if any) and writes `bytes`
    /// as the new canonical content.
    ///
    /// The whole sequence holds the write lock, giving uploads a total
    /// order. A rotation or write failure aborts the replacement; no retry.
    pub async fn replace(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.rotator.rotate(&self.target).await?;
        fs::write(&self.target, bytes).await?;
        info!("canonical artifact replaced ({} bytes)", bytes.len());
        Ok(())
    }

    /// Opens a readable handle to the canonical artifact, or `None` when it
    /// does not exist.
    pub async fn open_reader(&self) -> Result<Option<fs::File>, StoreError> {
        match fs::File::open(&self.target).await {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads the full canonical content, or `None` when it does not exist.
    pub async fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.target).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Current backup set, newest first.
    pub async fn list_backups(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = self.rotator.list().await?;
        Ok(entries.into_iter().map(|(path, _)| path).collect())
    }
}
