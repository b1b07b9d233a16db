// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Loading and publishing descriptors
//!
//! `CatalogStore` pairs a storage backend with the path resolver and is the
//! only component that moves descriptors in and out of storage.
//!
//! Publishing follows a leaf-before-root discipline: a new table or job
//! descriptor is durably written before the catalog that references it. A
//! crash between the two writes leaves an unreferenced leaf behind, which
//! [`CatalogStore::find_orphans`] can report later. The reverse order could
//! leave the catalog pointing at a descriptor that does not exist.
//!
//! Ids are consumed as soon as the catalog issues them. A publish that fails
//! after allocation does not give its id back.

use log::{debug, info, warn};
use std::sync::Arc;

use super::codec::{self, DescriptorFormat};
use super::database::DatabaseMetadata;
use super::error::{CatalogError, CatalogResult};
use super::item::{ImageFormatGroupMetadata, VideoMetadata};
use super::job::JobMetadata;
use super::metadata::Metadata;
use super::paths::{DescriptorKey, PathResolver};
use super::table::TableMetadata;
use super::{ColumnId, ItemId, JobId, TableId};
use crate::config::CatalogConfig;
use crate::storage::{open_backend, StorageBackend, StorageError};

/// Descriptors present in storage but not referenced by the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Orphans {
    pub tables: Vec<TableId>,
    pub jobs: Vec<JobId>,
}

impl Orphans {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.jobs.is_empty()
    }
}

/// Reads and writes catalog descriptors through one backend
pub struct CatalogStore {
    backend: Arc<dyn StorageBackend>,
    paths: Arc<PathResolver>,
    format: DescriptorFormat,
}

impl CatalogStore {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        paths: Arc<PathResolver>,
        format: DescriptorFormat,
    ) -> Self {
        Self {
            backend,
            paths,
            format,
        }
    }

    /// Open the backend named by `config`
    pub fn open(config: &CatalogConfig) -> CatalogResult<Self> {
        let backend = open_backend(config.storage_type, &config.db_path)?;
        Ok(Self::new(
            backend,
            Arc::new(config.path_resolver()),
            config.format,
        ))
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    pub fn paths(&self) -> &Arc<PathResolver> {
        &self.paths
    }

    pub fn format(&self) -> DescriptorFormat {
        self.format
    }

    // ---------------------------------------------------------------------
    // Generic descriptor I/O
    // ---------------------------------------------------------------------

    /// Persist `meta` at its canonical path and return that path
    pub fn write_metadata<M: Metadata>(&self, meta: &M) -> CatalogResult<String> {
        let key = meta.descriptor_key().ok_or_else(|| {
            CatalogError::InvalidOperation(format!(
                "{} has no id yet; publish it through the catalog first",
                M::KIND
            ))
        })?;
        let path = self.paths.path(&key);
        let descriptor = meta.descriptor();
        let bytes = codec::encode(self.format, &*descriptor)?;
        self.backend.write(&path, &bytes)?;
        debug!("Wrote {} descriptor ({} bytes) to {}", M::KIND, bytes.len(), path);
        Ok(path)
    }

    /// Load and validate the descriptor stored under `key`
    pub fn read_metadata<M: Metadata>(&self, key: DescriptorKey) -> CatalogResult<M> {
        if key.kind() != M::KIND {
            return Err(CatalogError::InvalidOperation(format!(
                "cannot load a {} descriptor from a {} key",
                M::KIND,
                key.kind()
            )));
        }
        let path = self.paths.path(&key);
        let bytes = self.backend.read(&path).map_err(|e| match e {
            StorageError::NotFound(_) => {
                CatalogError::NotFound(format!("{} descriptor at '{}'", M::KIND, path))
            }
            other => CatalogError::Storage(other),
        })?;
        debug!("Read {} descriptor ({} bytes) from {}", M::KIND, bytes.len(), path);

        let descriptor = codec::decode(&path, &bytes)?;
        let meta = M::from_descriptor(descriptor).map_err(|e| e.at_path(&path))?;
        match meta.descriptor_key() {
            Some(found) if found == key => Ok(meta),
            found => Err(CatalogError::corruption(
                path,
                format!("descriptor describes {:?}, expected {:?}", found, key),
            )),
        }
    }

    fn exists(&self, key: &DescriptorKey) -> CatalogResult<bool> {
        Ok(self.backend.exists(&self.paths.path(key))?)
    }

    // ---------------------------------------------------------------------
    // Catalog
    // ---------------------------------------------------------------------

    /// Load the catalog; `NotFound` if this database was never written
    pub fn load_catalog(&self) -> CatalogResult<DatabaseMetadata> {
        self.read_metadata(DescriptorKey::Database)
    }

    /// Load the catalog, or start an empty in-memory one if none exists yet
    pub fn load_or_init_catalog(&self) -> CatalogResult<DatabaseMetadata> {
        match self.load_catalog() {
            Err(CatalogError::NotFound(_)) => {
                info!("No catalog at {}, starting empty", self.paths.database_path());
                Ok(DatabaseMetadata::new())
            }
            other => other,
        }
    }

    /// Write an empty catalog unless one already exists
    ///
    /// Returns the catalog now in storage.
    pub fn init_catalog(&self) -> CatalogResult<DatabaseMetadata> {
        if self.exists(&DescriptorKey::Database)? {
            return self.load_catalog();
        }
        let catalog = DatabaseMetadata::new();
        self.write_database_metadata(&catalog)?;
        info!("Initialized empty catalog at {}", self.paths.database_path());
        Ok(catalog)
    }

    pub fn write_database_metadata(&self, catalog: &DatabaseMetadata) -> CatalogResult<()> {
        self.write_metadata(catalog)?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Tables
    // ---------------------------------------------------------------------

    pub fn load_table(&self, table_id: TableId) -> CatalogResult<TableMetadata> {
        self.read_metadata(DescriptorKey::Table(table_id))
    }

    pub fn load_table_by_name(
        &self,
        catalog: &DatabaseMetadata,
        name: &str,
    ) -> CatalogResult<TableMetadata> {
        self.load_table(catalog.get_table_id(name)?)
    }

    /// Write a table descriptor that already has an id
    pub fn write_table_metadata(&self, table: &TableMetadata) -> CatalogResult<()> {
        self.write_metadata(table)?;
        Ok(())
    }

    /// Register `table` in `catalog` and persist both, leaf first
    ///
    /// `table` must not have been published before. On success both
    /// arguments carry the new id and are durable. The id stays consumed on
    /// failure. If the table descriptor could not be written, the catalog
    /// entry is withdrawn and `table` is left unpublished so it can be
    /// retried under the same name.
    pub fn write_new_table(
        &self,
        catalog: &mut DatabaseMetadata,
        table: &mut TableMetadata,
    ) -> CatalogResult<TableId> {
        if let Some(id) = table.id() {
            return Err(CatalogError::InvalidOperation(format!(
                "table '{}' is already published as id {}",
                table.name(),
                id
            )));
        }
        info!("Writing new table {}...", table.name());

        let table_id = catalog.add_table(table.name())?;
        table.set_id(table_id);

        if let Err(e) = self.write_table_metadata(table) {
            warn!(
                "Failed to write descriptor of new table {} (id {}): {}",
                table.name(),
                table_id,
                e
            );
            catalog.remove_table(table_id)?;
            table.clear_id();
            return Err(e);
        }
        self.write_database_metadata(catalog)?;

        info!("Finished writing new table {} (id {}).", table.name(), table_id);
        Ok(table_id)
    }

    /// Remove a table from the catalog and persist the catalog
    ///
    /// The table descriptor and its items stay in storage as orphans.
    pub fn delete_table(
        &self,
        catalog: &mut DatabaseMetadata,
        table_id: TableId,
    ) -> CatalogResult<()> {
        catalog.remove_table(table_id)?;
        self.write_database_metadata(catalog)?;
        info!("Deleted table id {} from the catalog", table_id);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Jobs
    // ---------------------------------------------------------------------

    pub fn load_job(&self, job_id: JobId) -> CatalogResult<JobMetadata> {
        self.read_metadata(DescriptorKey::Job(job_id))
    }

    pub fn load_job_by_name(
        &self,
        catalog: &DatabaseMetadata,
        name: &str,
    ) -> CatalogResult<JobMetadata> {
        self.load_job(catalog.get_job_id(name)?)
    }

    pub fn write_job_metadata(&self, job: &JobMetadata) -> CatalogResult<()> {
        self.write_metadata(job)?;
        Ok(())
    }

    /// Register `job` in `catalog` and persist both, leaf first
    ///
    /// Failure handling matches [`CatalogStore::write_new_table`].
    pub fn write_new_job(
        &self,
        catalog: &mut DatabaseMetadata,
        job: &mut JobMetadata,
    ) -> CatalogResult<JobId> {
        if let Some(id) = job.id() {
            return Err(CatalogError::InvalidOperation(format!(
                "job '{}' is already published as id {}",
                job.name(),
                id
            )));
        }
        info!("Writing new job {}...", job.name());

        let job_id = catalog.add_job(job.name())?;
        job.set_id(job_id);

        if let Err(e) = self.write_job_metadata(job) {
            warn!(
                "Failed to write descriptor of new job {} (id {}): {}",
                job.name(),
                job_id,
                e
            );
            catalog.remove_job(job_id)?;
            job.clear_id();
            return Err(e);
        }
        self.write_database_metadata(catalog)?;

        info!("Finished writing new job {} (id {}).", job.name(), job_id);
        Ok(job_id)
    }

    pub fn delete_job(&self, catalog: &mut DatabaseMetadata, job_id: JobId) -> CatalogResult<()> {
        catalog.remove_job(job_id)?;
        self.write_database_metadata(catalog)?;
        info!("Deleted job id {} from the catalog", job_id);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------------

    pub fn load_video_metadata(
        &self,
        table_id: TableId,
        column_id: ColumnId,
        item_id: ItemId,
    ) -> CatalogResult<VideoMetadata> {
        self.read_metadata(DescriptorKey::Video {
            table_id,
            column_id,
            item_id,
        })
    }

    /// Item descriptors are leaves; no catalog write follows
    pub fn write_video_metadata(&self, video: &VideoMetadata) -> CatalogResult<()> {
        self.write_metadata(video)?;
        Ok(())
    }

    pub fn load_image_format_group(
        &self,
        table_id: TableId,
        column_id: ColumnId,
        item_id: ItemId,
    ) -> CatalogResult<ImageFormatGroupMetadata> {
        self.read_metadata(DescriptorKey::ImageFormatGroup {
            table_id,
            column_id,
            item_id,
        })
    }

    pub fn write_image_format_group(&self, group: &ImageFormatGroupMetadata) -> CatalogResult<()> {
        self.write_metadata(group)?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Maintenance
    // ---------------------------------------------------------------------

    /// Find table and job descriptors the catalog no longer references
    ///
    /// Probes every id the catalog has issued. Nothing is deleted.
    pub fn find_orphans(&self, catalog: &DatabaseMetadata) -> CatalogResult<Orphans> {
        let mut orphans = Orphans::default();

        for table_id in 0..catalog.next_table_id() {
            if !catalog.has_table_id(table_id) && self.exists(&DescriptorKey::Table(table_id))? {
                orphans.tables.push(table_id);
            }
        }
        for job_id in 0..catalog.next_job_id() {
            if !catalog.has_job_id(job_id) && self.exists(&DescriptorKey::Job(job_id))? {
                orphans.jobs.push(job_id);
            }
        }

        if !orphans.is_empty() {
            warn!(
                "Found {} orphaned table and {} orphaned job descriptors",
                orphans.tables.len(),
                orphans.jobs.len()
            );
        }
        Ok(orphans)
    }
}
