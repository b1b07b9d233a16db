// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Sled storage backend

use std::path::Path;

use super::traits::StorageBackend;
use super::types::{StorageError, StorageResult, StorageType};

const DESCRIPTOR_TREE: &str = "descriptors";

/// Sled backend keeping every descriptor in one tree keyed by path
pub struct SledBackend {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let db = sled::open(path.as_ref())?;
        let tree = db.open_tree(DESCRIPTOR_TREE)?;
        Ok(Self { db, tree })
    }
}

impl StorageBackend for SledBackend {
    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.tree
            .get(path.as_bytes())?
            .map(|value| value.to_vec())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, bytes: &[u8]) -> StorageResult<()> {
        self.tree.insert(path.as_bytes(), bytes)?;
        // Publish ordering depends on this write being durable before the next one starts
        self.tree.flush()?;
        Ok(())
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        self.tree.remove(path.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.tree.contains_key(path.as_bytes())?)
    }

    fn flush(&self) -> StorageResult<()> {
        self.db.flush()?;
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Sled
    }
}
