// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Canonical storage paths for catalog descriptors.
//!
//! This module is the single source of truth for descriptor locations.
//! Readers and writers never build path strings themselves.
//!
//! # Path Layout
//!
//! ```text
//! {root}/
//! ├── db_metadata.bin
//! ├── tables/
//! │   └── {table_id}/
//! │       ├── descriptor.bin
//! │       ├── {column_id}_{item_id}_video_metadata.bin
//! │       └── {column_id}_{item_id}_image_metadata.bin
//! └── jobs/
//!     └── {job_id}/
//!         └── descriptor.bin
//! ```

use super::{ColumnId, ItemId, JobId, TableId};

const DATABASE_METADATA_FILE: &str = "db_metadata.bin";
const DESCRIPTOR_FILE: &str = "descriptor.bin";
const TABLES_DIR: &str = "tables";
const JOBS_DIR: &str = "jobs";

/// Kind of entity a descriptor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Database,
    Table,
    Job,
    Video,
    ImageFormatGroup,
}

impl DescriptorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Table => "table",
            Self::Job => "job",
            Self::Video => "video",
            Self::ImageFormatGroup => "image_format_group",
        }
    }
}

impl std::fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entity kind plus the key fields that locate one descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKey {
    /// The root catalog; there is exactly one
    Database,
    Table(TableId),
    Job(JobId),
    Video {
        table_id: TableId,
        column_id: ColumnId,
        item_id: ItemId,
    },
    ImageFormatGroup {
        table_id: TableId,
        column_id: ColumnId,
        item_id: ItemId,
    },
}

impl DescriptorKey {
    #[must_use]
    pub const fn kind(&self) -> DescriptorKind {
        match self {
            Self::Database => DescriptorKind::Database,
            Self::Table(_) => DescriptorKind::Table,
            Self::Job(_) => DescriptorKind::Job,
            Self::Video { .. } => DescriptorKind::Video,
            Self::ImageFormatGroup { .. } => DescriptorKind::ImageFormatGroup,
        }
    }
}

/// Maps descriptor keys to path strings under a fixed root
///
/// Built once from configuration and shared by every reader and writer of
/// a database. Path derivation is pure: no I/O, and distinct keys always map
/// to distinct paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathResolver {
    root: String,
}

impl PathResolver {
    /// Create a resolver that prefixes every path with `root`
    ///
    /// Trailing slashes are dropped; an empty root yields relative paths.
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        let trimmed = root.trim_end_matches('/');
        // Keep a bare "/" meaningful as the filesystem root
        let root = if trimmed.is_empty() && root.starts_with('/') {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        Self { root }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Canonical path for `key`
    #[must_use]
    pub fn path(&self, key: &DescriptorKey) -> String {
        let relative = match *key {
            DescriptorKey::Database => DATABASE_METADATA_FILE.to_string(),
            DescriptorKey::Table(table_id) => {
                format!("{}/{}", self.table_dir_relative(table_id), DESCRIPTOR_FILE)
            }
            DescriptorKey::Job(job_id) => {
                format!("{}/{}/{}", JOBS_DIR, job_id, DESCRIPTOR_FILE)
            }
            DescriptorKey::Video {
                table_id,
                column_id,
                item_id,
            } => format!(
                "{}/{}_{}_video_metadata.bin",
                self.table_dir_relative(table_id),
                column_id,
                item_id
            ),
            DescriptorKey::ImageFormatGroup {
                table_id,
                column_id,
                item_id,
            } => format!(
                "{}/{}_{}_image_metadata.bin",
                self.table_dir_relative(table_id),
                column_id,
                item_id
            ),
        };
        self.join(&relative)
    }

    pub fn database_path(&self) -> String {
        self.path(&DescriptorKey::Database)
    }

    pub fn table_path(&self, table_id: TableId) -> String {
        self.path(&DescriptorKey::Table(table_id))
    }

    pub fn job_path(&self, job_id: JobId) -> String {
        self.path(&DescriptorKey::Job(job_id))
    }

    /// Directory holding a table's descriptor and its item descriptors
    pub fn table_dir(&self, table_id: TableId) -> String {
        self.join(&self.table_dir_relative(table_id))
    }

    fn table_dir_relative(&self, table_id: TableId) -> String {
        format!("{}/{}", TABLES_DIR, table_id)
    }

    fn join(&self, relative: &str) -> String {
        match self.root.as_str() {
            "" => relative.to_string(),
            "/" => format!("/{}", relative),
            root => format!("{}/{}", root, relative),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = PathResolver::new("/data/db/");
        assert_eq!(paths.root(), "/data/db");
        assert_eq!(paths.database_path(), "/data/db/db_metadata.bin");
        assert_eq!(paths.table_path(7), "/data/db/tables/7/descriptor.bin");
        assert_eq!(paths.job_path(2), "/data/db/jobs/2/descriptor.bin");
        assert_eq!(
            paths.path(&DescriptorKey::Video {
                table_id: 7,
                column_id: 1,
                item_id: 12
            }),
            "/data/db/tables/7/1_12_video_metadata.bin"
        );
        assert_eq!(
            paths.path(&DescriptorKey::ImageFormatGroup {
                table_id: 7,
                column_id: 1,
                item_id: 12
            }),
            "/data/db/tables/7/1_12_image_metadata.bin"
        );
        assert_eq!(paths.table_dir(7), "/data/db/tables/7");
    }

    #[test]
    fn test_empty_and_slash_roots() {
        assert_eq!(PathResolver::new("").database_path(), "db_metadata.bin");
        assert_eq!(PathResolver::new("/").database_path(), "/db_metadata.bin");
        assert_eq!(PathResolver::default().table_path(0), "tables/0/descriptor.bin");
    }

    #[test]
    fn test_kinds_never_share_paths() {
        let paths = PathResolver::new("root");
        let keys = [
            DescriptorKey::Database,
            DescriptorKey::Table(1),
            DescriptorKey::Job(1),
            DescriptorKey::Video {
                table_id: 1,
                column_id: 1,
                item_id: 1,
            },
            DescriptorKey::ImageFormatGroup {
                table_id: 1,
                column_id: 1,
                item_id: 1,
            },
        ];
        let unique: std::collections::HashSet<String> =
            keys.iter().map(|k| paths.path(k)).collect();
        assert_eq!(unique.len(), keys.len());
    }
}
