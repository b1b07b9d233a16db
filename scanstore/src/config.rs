// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Database configuration
//!
//! Everything a process needs to reach one database: where the backend keeps
//! its bytes, which backend to use, the logical root under which descriptor
//! paths are derived, and the payload encoding for new descriptors. The
//! configuration is read once at startup and is not meant to change while
//! the process runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::{DescriptorFormat, PathResolver};
use crate::storage::StorageType;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration for opening a [`crate::CatalogStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory (or database file location) used by the backend
    pub db_path: PathBuf,
    /// Logical prefix of every descriptor path
    pub root: String,
    pub storage_type: StorageType,
    /// Encoding of newly written descriptors
    pub format: DescriptorFormat,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./db"),
            root: String::new(),
            storage_type: StorageType::default(),
            format: DescriptorFormat::default(),
        }
    }
}

impl CatalogConfig {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_storage_type(mut self, storage_type: StorageType) -> Self {
        self.storage_type = storage_type;
        self
    }

    pub fn with_format(mut self, format: DescriptorFormat) -> Self {
        self.format = format;
        self
    }

    /// Load a JSON config file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The resolver every component of this database shares
    pub fn path_resolver(&self) -> PathResolver {
        PathResolver::new(self.root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder() {
        let config = CatalogConfig::new("/tmp/x")
            .with_root("prod")
            .with_storage_type(StorageType::Posix)
            .with_format(DescriptorFormat::Json);
        assert_eq!(config.db_path, PathBuf::from("/tmp/x"));
        assert_eq!(config.path_resolver().database_path(), "prod/db_metadata.bin");
        assert_eq!(config.storage_type, StorageType::Posix);
        assert_eq!(config.format, DescriptorFormat::Json);
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("scanstore.json");
        std::fs::write(&file, r#"{ "db_path": "/data/db", "storage_type": "redb" }"#).unwrap();

        let config = CatalogConfig::from_file(&file).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/db"));
        assert_eq!(config.storage_type, StorageType::Redb);
        assert_eq!(config.root, "");
        assert_eq!(config.format, DescriptorFormat::Bincode);
    }

    #[test]
    fn test_from_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            CatalogConfig::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));

        let bad = temp_dir.path().join("bad.json");
        std::fs::write(&bad, r#"{ "storage_type": "tape" }"#).unwrap();
        assert!(matches!(
            CatalogConfig::from_file(&bad),
            Err(ConfigError::Parse { .. })
        ));
    }
}
