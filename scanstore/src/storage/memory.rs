// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory storage backend

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::traits::StorageBackend;
use super::types::{StorageError, StorageResult, StorageType};

/// Memory backend for tests and throwaway catalogs
///
/// Keeps read and write counters so callers can observe how often the
/// catalog actually touches storage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `read` calls served so far, including misses
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of successful `write` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// All stored paths, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.objects
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, bytes: &[u8]) -> StorageResult<()> {
        self.objects.write().insert(path.to_string(), bytes.to_vec());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        self.objects.write().remove(path);
        Ok(())
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.objects.read().contains_key(path))
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }
}
