// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Pluggable byte-level storage for catalog descriptors
//!
//! This module provides:
//! - The `StorageBackend` trait every store implements
//! - Filesystem, sled, redb and in-memory backends
//! - `open_backend` to pick one from a `StorageType`

mod memory;
mod posix;
#[cfg(feature = "redb-backend")]
mod redb_backend;
#[cfg(feature = "sled-backend")]
mod sled_backend;
mod traits;
mod types;

use log::info;
use std::path::Path;
use std::sync::Arc;

pub use memory::MemoryBackend;
pub use posix::PosixBackend;
#[cfg(feature = "redb-backend")]
pub use redb_backend::RedbBackend;
#[cfg(feature = "sled-backend")]
pub use sled_backend::SledBackend;
pub use traits::StorageBackend;
pub use types::{StorageError, StorageResult, StorageType};

/// Open the backend of the given type rooted at `path`
///
/// `Memory` ignores `path` and always starts empty.
pub fn open_backend<P: AsRef<Path>>(
    storage_type: StorageType,
    path: P,
) -> StorageResult<Arc<dyn StorageBackend>> {
    info!(
        "Opening {} storage at {}",
        storage_type,
        path.as_ref().display()
    );

    match storage_type {
        StorageType::Memory => Ok(Arc::new(MemoryBackend::new())),
        StorageType::Posix => Ok(Arc::new(PosixBackend::open(path)?)),
        #[cfg(feature = "sled-backend")]
        StorageType::Sled => Ok(Arc::new(SledBackend::open(path)?)),
        #[cfg(feature = "redb-backend")]
        StorageType::Redb => {
            std::fs::create_dir_all(path.as_ref())?;
            Ok(Arc::new(RedbBackend::open(path)?))
        }
        #[allow(unreachable_patterns)]
        other => Err(StorageError::Unavailable(other)),
    }
}
