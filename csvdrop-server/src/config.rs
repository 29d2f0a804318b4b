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

//! Configuration management for the csvdrop server.

use csvdrop_core::DEFAULT_MAX_BACKUPS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings (bind address, upload limit)
    pub server: ServerConfig,
    /// Storage settings (data directory, retention)
    pub storage: StorageConfig,
    /// Security settings (download token)
    pub security: SecurityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    /// Can be set via CSVDROP_BIND environment variable.
    pub bind: String,
    /// Maximum upload size in bytes.
    /// Can be set via CSVDROP_MAX_UPLOAD_SIZE (e.g., "50MB", "1024KB").
    pub max_upload_size: usize,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `target.csv` and the `backups/` subdirectory.
    /// Can be set via CSVDROP_DATA_DIR environment variable.
    pub data_dir: PathBuf,
    /// Number of archived versions retained after each rotation.
    /// Can be set via CSVDROP_MAX_BACKUPS environment variable.
    pub max_backups: usize,
}

/// Security configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Pre-shared bearer token required to download the canonical file.
    /// Can be set via CSVDROP_DOWNLOAD_TOKEN environment variable.
    pub download_token: String,
}

/// Parses a size string like "50MB", "1024KB", "5000" into bytes.
///
/// Supported suffixes (case-insensitive):
/// - GB, G: Gigabytes
/// - MB, M: Megabytes
/// - KB, K: Kilobytes
/// - B or no suffix: Bytes
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim().to_uppercase();

    if s.is_empty() {
        return Err("Empty size string".to_string());
    }

    let num_end = s.chars().position(|c| !c.is_ascii_digit() && c != '.').unwrap_or(s.len());

    let (num_str, suffix) = s.split_at(num_end);
    let suffix = suffix.trim();

    let num: f64 = num_str.parse().map_err(|_| format!("Invalid number: {}", num_str))?;

    let multiplier: usize = match suffix {
        "GB" | "G" => 1024 * 1024 * 1024,
        "MB" | "M" => 1024 * 1024,
        "KB" | "K" => 1024,
        "B" | "" => 1,
        _ => return Err(format!("Unknown size suffix: {}", suffix)),
    };

    Ok((num * multiplier as f64) as usize)
}

impl Config {
    /// Loads configuration from environment variables, with defaults.
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self::default())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: std::env::var("CSVDROP_BIND")
                    .unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
                max_upload_size: std::env::var("CSVDROP_MAX_UPLOAD_SIZE")
                    .ok()
                    .and_then(|s| parse_size(&s).ok())
                    .unwrap_or(csvdrop_api::DEFAULT_MAX_UPLOAD_SIZE),
            },
            storage: StorageConfig {
                data_dir: std::env::var("CSVDROP_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".")),
                max_backups: std::env::var("CSVDROP_MAX_BACKUPS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_MAX_BACKUPS),
            },
            security: SecurityConfig {
                // Load the token from the environment; generate a random
                // dev token if not set so no credential lives in source.
                download_token: std::env::var("CSVDROP_DOWNLOAD_TOKEN").unwrap_or_else(|_| {
                    use std::collections::hash_map::DefaultHasher;
                    use std::hash::{Hash, Hasher};
                    let mut hasher = DefaultHasher::new();
                    (std::time::SystemTime::now(), std::process::id()).hash(&mut hasher);
                    format!("dev-{:016x}", hasher.finish())
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_bytes() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_size_kb() {
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("10kb").unwrap(), 10 * 1024);
    }

    #[test]
    fn test_parse_size_mb() {
        assert_eq!(parse_size("1MB").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("50mb").unwrap(), 50 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_gb() {
        assert_eq!(parse_size("1GB").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("2g").unwrap(), 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("1TB").is_err()); // TB not supported
    }

    #[test]
    fn test_default_config_has_a_token() {
        let config = Config::default();
        assert!(!config.security.download_token.is_empty());
        assert_eq!(config.storage.max_backups, DEFAULT_MAX_BACKUPS);
    }
}
