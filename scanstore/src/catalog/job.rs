// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Job metadata: configuration, output tables and row accounting
//!
//! A job is split into tasks. Each task produces rows for one output table
//! and is described by one or more samples; the first sample of a task
//! determines how many rows the task emits.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use super::column::{validate_columns, Column};
use super::error::{CatalogError, CatalogResult};
use super::metadata::Metadata;
use super::paths::{DescriptorKey, DescriptorKind};
use super::{ColumnId, JobId, TableId};

pub const DEFAULT_IO_ITEM_SIZE: i32 = 1000;
pub const DEFAULT_WORK_ITEM_SIZE: i32 = 250;

/// A contiguous selection of rows from one input table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub table_id: TableId,
    pub column_ids: Vec<ColumnId>,
    pub rows: Vec<i64>,
}

impl Sample {
    pub fn new(table_id: TableId, column_ids: Vec<ColumnId>, rows: Vec<i64>) -> Self {
        Self {
            table_id,
            column_ids,
            rows,
        }
    }

    pub fn row_count(&self) -> i64 {
        self.rows.len() as i64
    }
}

/// A unit of job output targeting one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub output_table_id: TableId,
    pub samples: Vec<Sample>,
}

impl Task {
    pub fn new(output_table_id: TableId, samples: Vec<Sample>) -> Self {
        Self {
            output_table_id,
            samples,
        }
    }

    /// Rows this task contributes to its output table
    fn output_rows(&self) -> i64 {
        // Construction guarantees at least one sample
        self.samples.first().map(Sample::row_count).unwrap_or(0)
    }
}

/// Serialized form of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub id: Option<JobId>,
    pub name: String,
    pub io_item_size: i32,
    pub work_item_size: i32,
    pub num_nodes: i32,
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

impl JobDescriptor {
    /// Unpublished job with default sizing on a single node
    pub fn new(name: impl Into<String>, columns: Vec<Column>, tasks: Vec<Task>) -> Self {
        Self {
            id: None,
            name: name.into(),
            io_item_size: DEFAULT_IO_ITEM_SIZE,
            work_item_size: DEFAULT_WORK_ITEM_SIZE,
            num_nodes: 1,
            columns,
            tasks,
        }
    }
}

fn check_descriptor(descriptor: &JobDescriptor) -> Result<(), String> {
    if descriptor.name.is_empty() {
        return Err("job name is empty".to_string());
    }
    if descriptor.io_item_size <= 0 || descriptor.work_item_size <= 0 {
        return Err(format!(
            "item sizes must be positive (io {}, work {})",
            descriptor.io_item_size, descriptor.work_item_size
        ));
    }
    if descriptor.num_nodes <= 0 {
        return Err(format!("node count must be positive, got {}", descriptor.num_nodes));
    }
    if let Some(index) = descriptor.tasks.iter().position(|t| t.samples.is_empty()) {
        return Err(format!("task {} has no samples", index));
    }
    validate_columns(&descriptor.columns).map_err(|e| match e {
        CatalogError::Corruption { reason, .. } => reason,
        other => other.to_string(),
    })
}

/// One job's configuration and output accounting
#[derive(Debug)]
pub struct JobMetadata {
    descriptor: JobDescriptor,
    /// Unique output tables in first-seen task order
    table_ids: Vec<TableId>,
    rows_in_table: Mutex<HashMap<TableId, i64>>,
    #[cfg(test)]
    row_scans: AtomicUsize,
}

impl JobMetadata {
    /// Build an unpublished job; it gets an id when it is written to a catalog
    pub fn new(descriptor: JobDescriptor) -> CatalogResult<Self> {
        check_descriptor(&descriptor).map_err(CatalogError::InvalidOperation)?;
        Ok(Self::build(JobDescriptor {
            id: None,
            ..descriptor
        }))
    }

    fn build(descriptor: JobDescriptor) -> Self {
        let mut table_ids: Vec<TableId> = Vec::new();
        for task in &descriptor.tasks {
            if !table_ids.contains(&task.output_table_id) {
                table_ids.push(task.output_table_id);
            }
        }
        Self {
            descriptor,
            table_ids,
            rows_in_table: Mutex::new(HashMap::new()),
            #[cfg(test)]
            row_scans: AtomicUsize::new(0),
        }
    }

    pub fn id(&self) -> Option<JobId> {
        self.descriptor.id
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn io_item_size(&self) -> i32 {
        self.descriptor.io_item_size
    }

    pub fn work_item_size(&self) -> i32 {
        self.descriptor.work_item_size
    }

    pub fn num_nodes(&self) -> i32 {
        self.descriptor.num_nodes
    }

    pub fn columns(&self) -> &[Column] {
        &self.descriptor.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.descriptor.tasks
    }

    pub fn column_id(&self, column_name: &str) -> CatalogResult<ColumnId> {
        self.columns()
            .iter()
            .find(|c| c.name() == column_name)
            .map(Column::id)
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "column '{}' in job '{}'",
                    column_name,
                    self.name()
                ))
            })
    }

    /// Tables this job writes to
    pub fn table_ids(&self) -> &[TableId] {
        &self.table_ids
    }

    pub fn has_table(&self, table_id: TableId) -> bool {
        self.table_ids.iter().any(|id| *id == table_id)
    }

    /// Rows this job wrote to `table_id`
    ///
    /// Sums the first sample of every task targeting the table. The result is
    /// cached per table, so repeated calls never rescan the task list.
    pub fn rows_in_table(&self, table_id: TableId) -> CatalogResult<i64> {
        let mut cache = self.rows_in_table.lock();
        if let Some(rows) = cache.get(&table_id) {
            return Ok(*rows);
        }
        if !self.has_table(table_id) {
            return Err(CatalogError::NotFound(format!(
                "table id {} in job '{}'",
                table_id,
                self.name()
            )));
        }

        #[cfg(test)]
        self.row_scans.fetch_add(1, Ordering::Relaxed);
        let rows = self
            .tasks()
            .iter()
            .filter(|task| task.output_table_id == table_id)
            .map(Task::output_rows)
            .sum();
        cache.insert(table_id, rows);
        Ok(rows)
    }

    /// Rows across every output table; recomputed on each call
    pub fn total_rows(&self) -> i64 {
        self.tasks().iter().map(Task::output_rows).sum()
    }

    /// Number of times `rows_in_table` had to scan the task list
    #[cfg(test)]
    pub(crate) fn row_scans(&self) -> usize {
        self.row_scans.load(Ordering::Relaxed)
    }

    pub(crate) fn set_id(&mut self, job_id: JobId) {
        self.descriptor.id = Some(job_id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.descriptor.id = None;
    }
}

impl Metadata for JobMetadata {
    type Descriptor = JobDescriptor;
    const KIND: DescriptorKind = DescriptorKind::Job;

    fn descriptor_key(&self) -> Option<DescriptorKey> {
        self.descriptor.id.map(DescriptorKey::Job)
    }

    fn descriptor(&self) -> Cow<'_, JobDescriptor> {
        Cow::Borrowed(&self.descriptor)
    }

    fn from_descriptor(descriptor: JobDescriptor) -> CatalogResult<Self> {
        check_descriptor(&descriptor).map_err(|reason| CatalogError::corruption("", reason))?;
        Ok(Self::build(descriptor))
    }
}
