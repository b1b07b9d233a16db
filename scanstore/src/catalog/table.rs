// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Table metadata: schema and row layout of one table

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::column::{validate_columns, Column, ColumnType};
use super::error::{CatalogError, CatalogResult};
use super::metadata::Metadata;
use super::paths::{DescriptorKey, DescriptorKind};
use super::{ColumnId, TableId};

/// Serialized form of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Assigned by the catalog when the table is published
    pub id: Option<TableId>,
    pub name: String,
    pub num_rows: i64,
    /// Rows stored together in one item
    pub rows_per_item: i64,
    pub columns: Vec<Column>,
}

fn check_descriptor(descriptor: &TableDescriptor) -> Result<(), String> {
    if descriptor.name.is_empty() {
        return Err("table name is empty".to_string());
    }
    if descriptor.num_rows < 0 {
        return Err(format!("negative row count {}", descriptor.num_rows));
    }
    if descriptor.rows_per_item < 0 {
        return Err(format!(
            "negative rows per item {}",
            descriptor.rows_per_item
        ));
    }
    if descriptor.rows_per_item == 0 && descriptor.num_rows > 0 {
        return Err("table has rows but zero rows per item".to_string());
    }
    validate_columns(&descriptor.columns).map_err(|e| match e {
        CatalogError::Corruption { reason, .. } => reason,
        other => other.to_string(),
    })
}

/// One table's schema and row accounting
///
/// Column lookups scan the ordered column list. A miss is reported as
/// `NotFound`; callers that only want to probe use [`TableMetadata::has_column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    descriptor: TableDescriptor,
}

impl TableMetadata {
    /// Build an unpublished table; it gets an id when it is written to a catalog
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        num_rows: i64,
        rows_per_item: i64,
    ) -> CatalogResult<Self> {
        let descriptor = TableDescriptor {
            id: None,
            name: name.into(),
            num_rows,
            rows_per_item,
            columns,
        };
        check_descriptor(&descriptor).map_err(CatalogError::InvalidOperation)?;
        Ok(Self { descriptor })
    }

    pub fn id(&self) -> Option<TableId> {
        self.descriptor.id
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn num_rows(&self) -> i64 {
        self.descriptor.num_rows
    }

    pub fn rows_per_item(&self) -> i64 {
        self.descriptor.rows_per_item
    }

    /// Number of items the rows are split into; the last may be partial
    pub fn num_items(&self) -> i64 {
        let rows = self.descriptor.num_rows;
        let per_item = self.descriptor.rows_per_item;
        if per_item == 0 {
            return 0;
        }
        rows / per_item + i64::from(rows % per_item != 0)
    }

    pub fn columns(&self) -> &[Column] {
        &self.descriptor.columns
    }

    pub fn has_column(&self, column_name: &str) -> bool {
        self.columns().iter().any(|c| c.name() == column_name)
    }

    pub fn column_name(&self, column_id: ColumnId) -> CatalogResult<&str> {
        self.column_by_id(column_id).map(Column::name)
    }

    pub fn column_id(&self, column_name: &str) -> CatalogResult<ColumnId> {
        self.columns()
            .iter()
            .find(|c| c.name() == column_name)
            .map(Column::id)
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "column '{}' in table '{}'",
                    column_name,
                    self.name()
                ))
            })
    }

    pub fn column_type(&self, column_id: ColumnId) -> CatalogResult<ColumnType> {
        self.column_by_id(column_id).map(Column::column_type)
    }

    fn column_by_id(&self, column_id: ColumnId) -> CatalogResult<&Column> {
        self.columns()
            .iter()
            .find(|c| c.id() == column_id)
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "column id {} in table '{}'",
                    column_id,
                    self.name()
                ))
            })
    }

    pub(crate) fn set_id(&mut self, table_id: TableId) {
        self.descriptor.id = Some(table_id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.descriptor.id = None;
    }
}

impl Metadata for TableMetadata {
    type Descriptor = TableDescriptor;
    const KIND: DescriptorKind = DescriptorKind::Table;

    fn descriptor_key(&self) -> Option<DescriptorKey> {
        self.descriptor.id.map(DescriptorKey::Table)
    }

    fn descriptor(&self) -> Cow<'_, TableDescriptor> {
        Cow::Borrowed(&self.descriptor)
    }

    fn from_descriptor(descriptor: TableDescriptor) -> CatalogResult<Self> {
        check_descriptor(&descriptor).map_err(|reason| CatalogError::corruption("", reason))?;
        Ok(Self { descriptor })
    }
}
