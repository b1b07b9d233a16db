// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Metadata catalog
//!
//! This module implements the catalog of a table-structured store for
//! per-item video and image data:
//! - The root registry mapping table and job names to stable ids
//! - Table and job metadata (columns, row accounting)
//! - Per-item shape descriptors for videos and image groups
//! - Canonical descriptor paths
//! - Ordered, crash-tolerant publishing through `CatalogStore`

pub mod codec;
pub mod column;
pub mod database;
pub mod error;
pub mod item;
pub mod job;
pub mod metadata;
pub mod paths;
pub mod store;
pub mod table;

/// Catalog-issued table identifier
pub type TableId = i32;
/// Catalog-issued job identifier
pub type JobId = i32;
/// Column identifier, unique within one table or job
pub type ColumnId = i32;
/// Item identifier, unique within one table column
pub type ItemId = i32;

pub use codec::DescriptorFormat;
pub use column::{Column, ColumnType};
pub use database::{CatalogEntry, DatabaseDescriptor, DatabaseMetadata};
pub use error::{CatalogError, CatalogResult};
pub use item::{
    ImageColorSpace, ImageEncodingType, ImageFormatGroupDescriptor, ImageFormatGroupMetadata,
    VideoDescriptor, VideoMetadata,
};
pub use job::{JobDescriptor, JobMetadata, Sample, Task};
pub use metadata::Metadata;
pub use paths::{DescriptorKey, DescriptorKind, PathResolver};
pub use store::{CatalogStore, Orphans};
pub use table::{TableDescriptor, TableMetadata};
