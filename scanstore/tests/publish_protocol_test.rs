// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Crash-ordering tests for table and job publishing

use parking_lot::Mutex;
use scanstore::storage::MemoryBackend;
use scanstore::{
    CatalogError, CatalogStore, Column, ColumnType, DatabaseMetadata, DescriptorFormat,
    JobDescriptor, JobMetadata, PathResolver, Sample, StorageBackend, StorageError,
    StorageType, TableMetadata, Task,
};
use std::sync::Arc;

/// Memory backend that fails every write whose path contains a marker
struct FailingBackend {
    inner: MemoryBackend,
    fail_on: Mutex<Option<String>>,
    write_log: Mutex<Vec<String>>,
}

impl FailingBackend {
    fn new() -> Self {
        Self {
            inner: MemoryBackend::new(),
            fail_on: Mutex::new(None),
            write_log: Mutex::new(Vec::new()),
        }
    }

    fn fail_writes_containing(&self, marker: &str) {
        *self.fail_on.lock() = Some(marker.to_string());
    }

    fn heal(&self) {
        *self.fail_on.lock() = None;
    }

    fn write_log(&self) -> Vec<String> {
        self.write_log.lock().clone()
    }
}

impl StorageBackend for FailingBackend {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.inner.read(path)
    }

    fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(marker) = self.fail_on.lock().as_deref() {
            if path.contains(marker) {
                return Err(StorageError::BackendSpecific(format!(
                    "injected failure writing {}",
                    path
                )));
            }
        }
        self.inner.write(path, bytes)?;
        self.write_log.lock().push(path.to_string());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.inner.delete(path)
    }

    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        self.inner.exists(path)
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }
}

fn setup() -> (Arc<FailingBackend>, CatalogStore) {
    let backend = Arc::new(FailingBackend::new());
    let store = CatalogStore::new(
        backend.clone(),
        Arc::new(PathResolver::new("/scan")),
        DescriptorFormat::Json,
    );
    (backend, store)
}

fn table(name: &str) -> TableMetadata {
    TableMetadata::new(
        name,
        vec![
            Column::new(0, "index", ColumnType::Int),
            Column::new(1, "frame", ColumnType::Video),
        ],
        10,
        5,
    )
    .unwrap()
}

#[test]
fn test_leaf_is_written_before_root() {
    let (backend, store) = setup();
    let mut catalog = store.init_catalog().unwrap();

    store
        .write_new_table(&mut catalog, &mut table("videos"))
        .unwrap();

    assert_eq!(
        backend.write_log(),
        vec![
            "/scan/db_metadata.bin".to_string(),
            "/scan/tables/0/descriptor.bin".to_string(),
            "/scan/db_metadata.bin".to_string(),
        ]
    );
}

#[test]
fn test_crash_before_root_flush_leaves_readable_orphan() {
    let (backend, store) = setup();
    let mut catalog = store.init_catalog().unwrap();

    backend.fail_writes_containing("db_metadata");
    let mut videos = table("videos");
    let err = store.write_new_table(&mut catalog, &mut videos).unwrap_err();
    assert!(matches!(err, CatalogError::Storage(_)));

    // Steps 1-3 completed: the leaf is independently readable
    let leaf = store.load_table(0).unwrap();
    assert_eq!(leaf.name(), "videos");

    // The durable catalog never heard of it
    let durable = store.load_catalog().unwrap();
    assert!(!durable.has_table("videos"));
    assert_eq!(durable.next_table_id(), 0);

    // Once the in-memory catalog is flushed again the leaf becomes visible
    backend.heal();
    store.write_database_metadata(&catalog).unwrap();
    assert_eq!(store.load_catalog().unwrap().get_table_id("videos").unwrap(), 0);
}

#[test]
fn test_crash_before_leaf_leaves_catalog_untouched() {
    let (backend, store) = setup();
    let mut catalog = store.init_catalog().unwrap();

    backend.fail_writes_containing("tables/");
    let err = store
        .write_new_table(&mut catalog, &mut table("videos"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Storage(_)));

    assert!(store.load_table(0).unwrap_err().is_not_found());
    assert!(store.load_catalog().unwrap().get_descriptor().tables.is_empty());
}

#[test]
fn test_failed_leaf_write_withdraws_catalog_entry() {
    let (backend, store) = setup();
    let mut catalog = store.init_catalog().unwrap();

    backend.fail_writes_containing("tables/0/");
    let mut videos = table("videos");
    assert!(store.write_new_table(&mut catalog, &mut videos).is_err());
    backend.heal();

    // The id is consumed but the name is free again
    assert_eq!(catalog.next_table_id(), 1);
    assert!(!catalog.has_table("videos"));
    assert!(!catalog.has_table_id(0));
    assert_eq!(videos.id(), None);

    // A later publish flushes the catalog; it must not reference table 0
    store
        .write_new_table(&mut catalog, &mut table("frames"))
        .unwrap();

    // Retrying the same object under the same name gets a fresh id
    let id = store.write_new_table(&mut catalog, &mut videos).unwrap();
    assert_eq!(id, 2);
    assert_eq!(videos.id(), Some(2));

    let durable = store.load_catalog().unwrap();
    assert_eq!(durable.get_table_id("videos").unwrap(), 2);
    for (id, name) in durable.tables() {
        let loaded = store.load_table(id).unwrap();
        assert_eq!(loaded.name(), name);
    }
    assert!(store.load_table(0).unwrap_err().is_not_found());
}

#[test]
fn test_retry_under_same_name_after_failed_leaf_write() {
    let (backend, store) = setup();
    let mut catalog = store.init_catalog().unwrap();

    backend.fail_writes_containing("tables/0/");
    assert!(store
        .write_new_table(&mut catalog, &mut table("videos"))
        .is_err());
    backend.heal();

    let id = store
        .write_new_table(&mut catalog, &mut table("videos"))
        .unwrap();
    assert_eq!(id, 1);

    let durable = store.load_catalog().unwrap();
    assert_eq!(durable.tables().count(), 1);
    for (id, name) in durable.tables() {
        assert_eq!(store.load_table(id).unwrap().name(), name);
    }
}

#[test]
fn test_failed_job_leaf_write_withdraws_catalog_entry() {
    let (backend, store) = setup();
    let mut catalog = store.init_catalog().unwrap();
    let mut job = JobMetadata::new(JobDescriptor::new(
        "detect",
        vec![],
        vec![Task::new(0, vec![Sample::new(0, vec![1], vec![0, 1])])],
    ))
    .unwrap();

    backend.fail_writes_containing("jobs/0/");
    assert!(store.write_new_job(&mut catalog, &mut job).is_err());
    backend.heal();

    assert!(!catalog.has_job("detect"));
    assert_eq!(job.id(), None);
    assert_eq!(store.write_new_job(&mut catalog, &mut job).unwrap(), 1);

    let durable = store.load_catalog().unwrap();
    for (id, name) in durable.jobs() {
        assert_eq!(store.load_job(id).unwrap().name(), name);
    }
}

#[test]
fn test_flushed_catalog_resolves_to_readable_tables() {
    let (_, store) = setup();
    let mut catalog = store.init_catalog().unwrap();
    for name in ["videos", "frames", "poses"] {
        store.write_new_table(&mut catalog, &mut table(name)).unwrap();
    }

    let durable = store.load_catalog().unwrap();
    for (id, name) in durable.tables() {
        let loaded = store.load_table(id).unwrap();
        assert_eq!(loaded.name(), name);
        assert_eq!(loaded.id(), Some(id));
    }
}

#[test]
fn test_job_publish_follows_same_order() {
    let (backend, store) = setup();
    let mut catalog = store.init_catalog().unwrap();

    let mut job = JobMetadata::new(JobDescriptor::new(
        "detect",
        vec![],
        vec![Task::new(0, vec![Sample::new(0, vec![1], vec![0, 1, 2])])],
    ))
    .unwrap();

    backend.fail_writes_containing("db_metadata");
    assert!(store.write_new_job(&mut catalog, &mut job).is_err());
    assert_eq!(store.load_job(0).unwrap().total_rows(), 3);
    assert!(!store.load_catalog().unwrap().has_job("detect"));
}

#[test]
fn test_delete_flushes_root_only() {
    let (backend, store) = setup();
    let mut catalog = DatabaseMetadata::new();
    store
        .write_new_table(&mut catalog, &mut table("videos"))
        .unwrap();
    let writes_before = backend.write_log().len();

    store.delete_table(&mut catalog, 0).unwrap();

    let log = backend.write_log();
    assert_eq!(log.len(), writes_before + 1);
    assert_eq!(log.last().unwrap(), "/scan/db_metadata.bin");
    assert_eq!(store.find_orphans(&catalog).unwrap().tables, vec![0]);
}
