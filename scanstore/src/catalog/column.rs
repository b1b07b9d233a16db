// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Column definitions shared by tables and jobs

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::{CatalogError, CatalogResult};
use super::ColumnId;

/// Storage type of a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Opaque per-row bytes
    Other,
    /// Encoded video stream, one item per video
    Video,
    /// Encoded images grouped by format
    Image,
    Int,
    Float,
    String,
    Bytes,
}

impl std::str::FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "other" => Ok(ColumnType::Other),
            "video" => Ok(ColumnType::Video),
            "image" => Ok(ColumnType::Image),
            "int" | "integer" => Ok(ColumnType::Int),
            "float" => Ok(ColumnType::Float),
            "string" | "text" => Ok(ColumnType::String),
            "bytes" => Ok(ColumnType::Bytes),
            _ => Err(format!(
                "Unknown column type: {}. Valid options: other, video, image, int, float, string, bytes",
                s
            )),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnType::Other => "other",
            ColumnType::Video => "video",
            ColumnType::Image => "image",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Bytes => "bytes",
        };
        write!(f, "{}", name)
    }
}

/// A single column: id, name and value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
}

impl Column {
    pub fn new(id: ColumnId, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id,
            name: name.into(),
            column_type,
        }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }
}

/// Reject column lists with repeated ids or names
///
/// Column lookups by id and by name are only meaningful when both are unique.
pub(crate) fn validate_columns(columns: &[Column]) -> CatalogResult<()> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for column in columns {
        if !ids.insert(column.id) {
            return Err(CatalogError::corruption(
                "",
                format!("column id {} appears more than once", column.id),
            ));
        }
        if !names.insert(column.name.as_str()) {
            return Err(CatalogError::corruption(
                "",
                format!("column name '{}' appears more than once", column.name),
            ));
        }
    }
    Ok(())
}
