// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Root catalog: table and job registries with monotonic id allocation
//!
//! The catalog is a directory, not a container. It owns only the name/id
//! indices; table and job descriptors are stored and loaded independently
//! by id. Ids come from counters that only ever increase, so an id is never
//! issued twice, even after the entity it named has been removed.

use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use super::error::{CatalogError, CatalogResult};
use super::metadata::Metadata;
use super::paths::{DescriptorKey, DescriptorKind};
use super::{JobId, TableId};

/// One (id, name) registry entry in the serialized catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i32,
    pub name: String,
}

/// Serialized form of the root catalog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatabaseDescriptor {
    pub next_table_id: TableId,
    pub next_job_id: JobId,
    pub tables: Vec<CatalogEntry>,
    pub jobs: Vec<CatalogEntry>,
}

/// Bidirectional id/name index for one entity kind
#[derive(Debug, Clone, Default)]
struct NameIndex {
    /// Ordered so exported entries are deterministic
    names: BTreeMap<i32, String>,
    ids: HashMap<String, i32>,
}

impl NameIndex {
    fn insert(&mut self, id: i32, name: String) {
        self.ids.insert(name.clone(), id);
        self.names.insert(id, name);
    }

    fn remove(&mut self, id: i32) -> Option<String> {
        let name = self.names.remove(&id)?;
        self.ids.remove(&name);
        Some(name)
    }

    fn id_of(&self, name: &str) -> Option<i32> {
        self.ids.get(name).copied()
    }

    fn name_of(&self, id: i32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    fn entries(&self) -> Vec<CatalogEntry> {
        self.names
            .iter()
            .map(|(id, name)| CatalogEntry {
                id: *id,
                name: name.clone(),
            })
            .collect()
    }

    fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Rebuild from exported entries, checking ids against the issued range
    fn from_entries(entries: Vec<CatalogEntry>, next_id: i32, kind: &str) -> CatalogResult<Self> {
        let mut index = NameIndex::default();
        for entry in entries {
            if entry.id < 0 || entry.id >= next_id {
                return Err(CatalogError::corruption(
                    "",
                    format!(
                        "{} id {} was never issued (next id is {})",
                        kind, entry.id, next_id
                    ),
                ));
            }
            if index.names.contains_key(&entry.id) {
                return Err(CatalogError::corruption(
                    "",
                    format!("{} id {} is registered twice", kind, entry.id),
                ));
            }
            if index.ids.contains_key(&entry.name) {
                return Err(CatalogError::corruption(
                    "",
                    format!("{} name '{}' is registered twice", kind, entry.name),
                ));
            }
            index.insert(entry.id, entry.name);
        }
        Ok(index)
    }
}

/// The root catalog of one database
#[derive(Debug, Clone, Default)]
pub struct DatabaseMetadata {
    next_table_id: TableId,
    next_job_id: JobId,
    tables: NameIndex,
    jobs: NameIndex,
}

impl DatabaseMetadata {
    /// Create an empty catalog whose first table and job ids are 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id `add_table` will issue
    pub fn next_table_id(&self) -> TableId {
        self.next_table_id
    }

    /// Next id `add_job` will issue
    pub fn next_job_id(&self) -> JobId {
        self.next_job_id
    }

    /// Export the live indices
    ///
    /// Rebuilt on every call so it always reflects prior mutations. This is
    /// the only serialization boundary of the catalog.
    pub fn get_descriptor(&self) -> DatabaseDescriptor {
        DatabaseDescriptor {
            next_table_id: self.next_table_id,
            next_job_id: self.next_job_id,
            tables: self.tables.entries(),
            jobs: self.jobs.entries(),
        }
    }

    // ---------------------------------------------------------------------
    // Tables
    // ---------------------------------------------------------------------

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.id_of(name).is_some()
    }

    pub fn has_table_id(&self, table_id: TableId) -> bool {
        self.tables.name_of(table_id).is_some()
    }

    pub fn get_table_id(&self, name: &str) -> CatalogResult<TableId> {
        self.tables
            .id_of(name)
            .ok_or_else(|| CatalogError::NotFound(format!("table '{}'", name)))
    }

    pub fn get_table_name(&self, table_id: TableId) -> CatalogResult<&str> {
        self.tables
            .name_of(table_id)
            .ok_or_else(|| CatalogError::NotFound(format!("table id {}", table_id)))
    }

    /// Register `name` under a freshly issued table id
    ///
    /// Names are unique; a duplicate is rejected without consuming an id.
    pub fn add_table(&mut self, name: &str) -> CatalogResult<TableId> {
        if let Some(existing) = self.tables.id_of(name) {
            return Err(CatalogError::DuplicateEntity(format!(
                "table '{}' already exists with id {}",
                name, existing
            )));
        }
        let table_id = self.next_table_id;
        self.next_table_id = table_id
            .checked_add(1)
            .ok_or_else(|| CatalogError::InvalidOperation("table id space exhausted".into()))?;
        self.tables.insert(table_id, name.to_string());
        debug!("Registered table '{}' as id {}", name, table_id);
        Ok(table_id)
    }

    /// Drop the index entry for `table_id`; the id is not reissued
    pub fn remove_table(&mut self, table_id: TableId) -> CatalogResult<()> {
        let name = self
            .tables
            .remove(table_id)
            .ok_or_else(|| CatalogError::NotFound(format!("table id {}", table_id)))?;
        debug!("Unregistered table '{}' (id {})", name, table_id);
        Ok(())
    }

    /// Registered tables in id order
    pub fn tables(&self) -> impl Iterator<Item = (TableId, &str)> {
        self.tables.iter()
    }

    // ---------------------------------------------------------------------
    // Jobs
    // ---------------------------------------------------------------------

    pub fn has_job(&self, name: &str) -> bool {
        self.jobs.id_of(name).is_some()
    }

    pub fn has_job_id(&self, job_id: JobId) -> bool {
        self.jobs.name_of(job_id).is_some()
    }

    pub fn get_job_id(&self, name: &str) -> CatalogResult<JobId> {
        self.jobs
            .id_of(name)
            .ok_or_else(|| CatalogError::NotFound(format!("job '{}'", name)))
    }

    pub fn get_job_name(&self, job_id: JobId) -> CatalogResult<&str> {
        self.jobs
            .name_of(job_id)
            .ok_or_else(|| CatalogError::NotFound(format!("job id {}", job_id)))
    }

    /// Register `name` under a freshly issued job id
    pub fn add_job(&mut self, name: &str) -> CatalogResult<JobId> {
        if let Some(existing) = self.jobs.id_of(name) {
            return Err(CatalogError::DuplicateEntity(format!(
                "job '{}' already exists with id {}",
                name, existing
            )));
        }
        let job_id = self.next_job_id;
        self.next_job_id = job_id
            .checked_add(1)
            .ok_or_else(|| CatalogError::InvalidOperation("job id space exhausted".into()))?;
        self.jobs.insert(job_id, name.to_string());
        debug!("Registered job '{}' as id {}", name, job_id);
        Ok(job_id)
    }

    pub fn remove_job(&mut self, job_id: JobId) -> CatalogResult<()> {
        let name = self
            .jobs
            .remove(job_id)
            .ok_or_else(|| CatalogError::NotFound(format!("job id {}", job_id)))?;
        debug!("Unregistered job '{}' (id {})", name, job_id);
        Ok(())
    }

    /// Registered jobs in id order
    pub fn jobs(&self) -> impl Iterator<Item = (JobId, &str)> {
        self.jobs.iter()
    }
}

impl Metadata for DatabaseMetadata {
    type Descriptor = DatabaseDescriptor;
    const KIND: DescriptorKind = DescriptorKind::Database;

    fn descriptor_key(&self) -> Option<DescriptorKey> {
        Some(DescriptorKey::Database)
    }

    fn descriptor(&self) -> Cow<'_, DatabaseDescriptor> {
        Cow::Owned(self.get_descriptor())
    }

    fn from_descriptor(descriptor: DatabaseDescriptor) -> CatalogResult<Self> {
        if descriptor.next_table_id < 0 || descriptor.next_job_id < 0 {
            return Err(CatalogError::corruption(
                "",
                format!(
                    "negative id counter (next table {}, next job {})",
                    descriptor.next_table_id, descriptor.next_job_id
                ),
            ));
        }
        let tables =
            NameIndex::from_entries(descriptor.tables, descriptor.next_table_id, "table")?;
        let jobs = NameIndex::from_entries(descriptor.jobs, descriptor.next_job_id, "job")?;
        Ok(Self {
            next_table_id: descriptor.next_table_id,
            next_job_id: descriptor.next_job_id,
            tables,
            jobs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lifecycle_never_reuses_ids() {
        let mut db = DatabaseMetadata::new();
        assert_eq!(db.add_table("videos").unwrap(), 0);
        assert_eq!(db.add_table("frames").unwrap(), 1);
        assert!(db.has_table("videos"));
        assert_eq!(db.get_table_id("videos").unwrap(), 0);

        db.remove_table(0).unwrap();
        assert!(!db.has_table_id(0));
        assert!(!db.has_table("videos"));

        assert_eq!(db.add_table("new").unwrap(), 2);
        assert_eq!(db.get_table_name(2).unwrap(), "new");
    }

    #[test]
    fn test_missing_lookups_are_not_found() {
        let mut db = DatabaseMetadata::new();
        assert!(db.get_table_id("ghost").unwrap_err().is_not_found());
        assert!(db.get_table_name(3).unwrap_err().is_not_found());
        assert!(db.remove_table(3).unwrap_err().is_not_found());
        assert!(db.get_job_id("ghost").unwrap_err().is_not_found());
        assert!(db.remove_job(0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_name_consumes_no_id() {
        let mut db = DatabaseMetadata::new();
        db.add_table("videos").unwrap();
        let err = db.add_table("videos").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateEntity(_)));
        assert_eq!(db.next_table_id(), 1);

        // A removed name may be registered again, under a new id
        db.remove_table(0).unwrap();
        assert_eq!(db.add_table("videos").unwrap(), 1);
    }

    #[test]
    fn test_jobs_have_their_own_counter() {
        let mut db = DatabaseMetadata::new();
        db.add_table("videos").unwrap();
        db.add_table("frames").unwrap();
        assert_eq!(db.add_job("detect").unwrap(), 0);
        assert_eq!(db.add_job("track").unwrap(), 1);
        assert!(db.has_job("track"));
        assert!(db.has_job_id(0));
        assert_eq!(db.get_job_name(1).unwrap(), "track");

        db.remove_job(0).unwrap();
        assert!(!db.has_job("detect"));
        assert_eq!(db.add_job("detect").unwrap(), 2);
    }

    #[test]
    fn test_descriptor_reflects_every_mutation() {
        let mut db = DatabaseMetadata::new();
        db.add_table("a").unwrap();
        db.add_table("b").unwrap();
        assert_eq!(db.get_descriptor().tables.len(), 2);

        db.remove_table(0).unwrap();
        db.add_job("j").unwrap();
        let descriptor = db.get_descriptor();
        assert_eq!(descriptor.next_table_id, 2);
        assert_eq!(descriptor.next_job_id, 1);
        assert_eq!(
            descriptor.tables,
            vec![CatalogEntry {
                id: 1,
                name: "b".to_string()
            }]
        );
        assert_eq!(descriptor.jobs.len(), 1);
    }

    #[test]
    fn test_descriptor_round_trip_keeps_counters() {
        let mut db = DatabaseMetadata::new();
        db.add_table("a").unwrap();
        db.add_table("b").unwrap();
        db.remove_table(1).unwrap();

        let mut reloaded = DatabaseMetadata::from_descriptor(db.get_descriptor()).unwrap();
        assert!(reloaded.has_table("a"));
        assert!(!reloaded.has_table_id(1));
        assert_eq!(reloaded.add_table("c").unwrap(), 2);
    }

    #[test]
    fn test_from_descriptor_rejects_unissued_ids() {
        let descriptor = DatabaseDescriptor {
            next_table_id: 1,
            next_job_id: 0,
            tables: vec![CatalogEntry {
                id: 5,
                name: "late".to_string(),
            }],
            jobs: vec![],
        };
        let err = DatabaseMetadata::from_descriptor(descriptor).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_from_descriptor_rejects_duplicates() {
        let entry = |id: i32, name: &str| CatalogEntry {
            id,
            name: name.to_string(),
        };
        let dup_name = DatabaseDescriptor {
            next_table_id: 2,
            tables: vec![entry(0, "x"), entry(1, "x")],
            ..Default::default()
        };
        assert!(DatabaseMetadata::from_descriptor(dup_name)
            .unwrap_err()
            .is_corruption());

        let dup_id = DatabaseDescriptor {
            next_job_id: 2,
            jobs: vec![entry(0, "x"), entry(0, "y")],
            ..Default::default()
        };
        assert!(DatabaseMetadata::from_descriptor(dup_id)
            .unwrap_err()
            .is_corruption());
    }
}
