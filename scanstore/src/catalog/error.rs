// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog error types

use thiserror::Error;

use crate::storage::StorageError;

/// Errors produced by catalog lookups, descriptor loading and publishing
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A requested id, name, column or descriptor is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// A name is already registered in the catalog
    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    /// A loaded descriptor violates a structural invariant
    #[error("Corrupt descriptor at '{path}': {reason}")]
    Corruption { path: String, reason: String },

    /// The operation does not apply to the entity in its current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A descriptor could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Opaque failure from the storage backend
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CatalogError {
    pub fn corruption(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Corruption {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }

    pub fn is_corruption(&self) -> bool {
        matches!(self, CatalogError::Corruption { .. })
    }

    /// Attach the descriptor path to a corruption raised before the path was known
    pub(crate) fn at_path(self, path: &str) -> Self {
        match self {
            CatalogError::Corruption { path: p, reason } if p.is_empty() => {
                CatalogError::Corruption {
                    path: path.to_string(),
                    reason,
                }
            }
            other => other,
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
