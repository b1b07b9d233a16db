// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Scanstore - metadata catalog and descriptor persistence
//!
//! Scanstore keeps the durable directory of a table-structured store for
//! per-item video and image column data. It maps table and job names to
//! stable integer ids, stores table, job and per-item shape descriptors at
//! canonical paths, and publishes new entries leaf-first so that a crash
//! never leaves the catalog pointing at a missing descriptor.
//!
//! ```ignore
//! use scanstore::{CatalogConfig, CatalogStore, Column, ColumnType, TableMetadata};
//!
//! let store = CatalogStore::open(&CatalogConfig::new("./db"))?;
//! let mut catalog = store.load_or_init_catalog()?;
//! let mut table = TableMetadata::new(
//!     "videos",
//!     vec![Column::new(0, "frame", ColumnType::Video)],
//!     0,
//!     0,
//! )?;
//! let table_id = store.write_new_table(&mut catalog, &mut table)?;
//! ```

pub mod catalog;
pub mod config;
pub mod storage;

pub use catalog::{
    CatalogError, CatalogResult, CatalogStore, Column, ColumnId, ColumnType, DatabaseMetadata,
    DescriptorFormat, DescriptorKey, ImageFormatGroupMetadata, ItemId, JobDescriptor, JobId,
    JobMetadata, Metadata, PathResolver, Sample, TableId, TableMetadata, Task, VideoMetadata,
};
pub use config::{CatalogConfig, ConfigError};
pub use storage::{open_backend, StorageBackend, StorageError, StorageType};
