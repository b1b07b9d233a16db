// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Storage backend types and error handling
//!
//! This module defines the types, enums, and error handling shared by every
//! storage backend.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Storage backend type configuration
///
/// Specifies which underlying storage technology holds descriptor bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Plain files under a root directory, one file per descriptor path
    /// Best for: inspection with ordinary tools, shared filesystems
    Posix,

    /// Sled - Pure Rust embedded database
    /// Best for: Production, development, testing
    #[default]
    Sled,

    /// Redb - Pure Rust ACID-compliant embedded database
    /// Best for: ACID guarantees, crash-safety, zero-copy reads
    Redb,

    /// Memory - In-memory storage for testing
    /// Best for: Unit testing, development
    Memory,
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "posix" | "file" => Ok(StorageType::Posix),
            "sled" => Ok(StorageType::Sled),
            "redb" => Ok(StorageType::Redb),
            "memory" => Ok(StorageType::Memory),
            _ => Err(format!(
                "Unknown storage type: {}. Valid options: posix, sled, redb, memory",
                s
            )),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StorageType::Posix => "posix",
            StorageType::Sled => "sled",
            StorageType::Redb => "redb",
            StorageType::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

/// Error type for storage backend operations
///
/// The catalog treats everything except `NotFound` as opaque. Retries, if
/// any, belong to the backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No object is stored at the requested path
    #[error("Path not found: {0}")]
    NotFound(String),

    /// I/O related errors (file system, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific error (Sled, Redb, etc.)
    #[error("Storage backend error: {0}")]
    BackendSpecific(String),

    /// The requested backend was not compiled into this build
    #[error("Storage type '{0}' is not available in this build")]
    Unavailable(StorageType),
}

impl StorageError {
    /// True when the error only means "nothing stored at this path"
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

#[cfg(feature = "sled-backend")]
impl From<sled::Error> for StorageError {
    fn from(e: sled::Error) -> Self {
        match e {
            sled::Error::Io(io) => StorageError::Io(io),
            other => StorageError::BackendSpecific(other.to_string()),
        }
    }
}

/// Result type for storage backend operations
pub type StorageResult<T> = Result<T, StorageError>;
