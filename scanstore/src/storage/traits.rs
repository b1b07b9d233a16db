// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Storage backend trait
//!
//! Backends are addressed purely by the path strings produced by
//! [`crate::catalog::PathResolver`]. Atomicity of an individual write is the
//! backend's responsibility; the catalog only relies on the order in which
//! writes complete.

use super::types::{StorageResult, StorageType};

/// Byte-level key-value-by-path store
pub trait StorageBackend: Send + Sync {
    /// Read the full object stored at `path`
    ///
    /// Returns `StorageError::NotFound` if nothing is stored there.
    fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Replace the object stored at `path`
    ///
    /// When this returns `Ok` the bytes must survive a process crash.
    fn write(&self, path: &str, bytes: &[u8]) -> StorageResult<()>;

    /// Remove the object at `path`. Removing a missing path is not an error.
    fn delete(&self, path: &str) -> StorageResult<()>;

    /// Check whether an object is stored at `path`
    fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Force any buffered writes to durable storage
    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }

    /// Which storage technology this backend uses
    fn storage_type(&self) -> StorageType;
}
