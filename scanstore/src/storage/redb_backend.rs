// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! REDB storage backend

use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;

use super::traits::StorageBackend;
use super::types::{StorageError, StorageResult, StorageType};

/// All descriptors live in a single table keyed by path
const DESCRIPTORS: TableDefinition<&str, &[u8]> = TableDefinition::new("descriptors");

const DB_FILE_NAME: &str = "scanstore.redb";

fn backend_err<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::BackendSpecific(e.to_string())
}

/// REDB backend implementation
///
/// Every write runs in its own write transaction and is durable once
/// `commit` returns.
pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        // REDB requires a file path, not a directory
        let db_path = if path.as_ref().is_dir() {
            path.as_ref().join(DB_FILE_NAME)
        } else {
            path.as_ref().to_path_buf()
        };

        let db = Database::create(&db_path).map_err(backend_err)?;

        // Make sure the table exists so read transactions can open it
        let write_txn = db.begin_write().map_err(backend_err)?;
        {
            let _ = write_txn.open_table(DESCRIPTORS).map_err(backend_err)?;
        }
        write_txn.commit().map_err(backend_err)?;

        Ok(Self { db })
    }
}

impl StorageBackend for RedbBackend {
    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let read_txn = self.db.begin_read().map_err(backend_err)?;
        let table = read_txn.open_table(DESCRIPTORS).map_err(backend_err)?;

        let result = table.get(path).map_err(backend_err)?;
        result
            .map(|guard| guard.value().to_vec())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, bytes: &[u8]) -> StorageResult<()> {
        let write_txn = self.db.begin_write().map_err(backend_err)?;
        {
            let mut table = write_txn.open_table(DESCRIPTORS).map_err(backend_err)?;
            table.insert(path, bytes).map_err(backend_err)?;
        }
        write_txn.commit().map_err(backend_err)?;
        Ok(())
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write().map_err(backend_err)?;
        {
            let mut table = write_txn.open_table(DESCRIPTORS).map_err(backend_err)?;
            table.remove(path).map_err(backend_err)?;
        }
        write_txn.commit().map_err(backend_err)?;
        Ok(())
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read().map_err(backend_err)?;
        let table = read_txn.open_table(DESCRIPTORS).map_err(backend_err)?;
        Ok(table.get(path).map_err(backend_err)?.is_some())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Redb
    }
}
