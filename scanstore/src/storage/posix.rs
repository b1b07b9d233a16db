// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Filesystem storage backend
//!
//! Every descriptor path maps to one file under the backend's root
//! directory. Writes go to a sibling temp file which is synced and then
//! renamed over the target, so a reader never observes a half-written file.

use log::debug;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use super::traits::StorageBackend;
use super::types::{StorageError, StorageResult, StorageType};

const TEMP_SUFFIX: &str = ".tmp";

/// Backend storing each path as a file under `root`
#[derive(Debug, Clone)]
pub struct PosixBackend {
    root: PathBuf,
}

impl PosixBackend {
    /// Open (and create if needed) a backend rooted at `root`
    pub fn open<P: AsRef<Path>>(root: P) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, path: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::BackendSpecific(format!(
                "Path '{}' escapes the storage root",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl StorageBackend for PosixBackend {
    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let file = self.file_path(path)?;
        match fs::read(&file) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &str, bytes: &[u8]) -> StorageResult<()> {
        let target = self.file_path(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut temp_name = target.as_os_str().to_owned();
        temp_name.push(TEMP_SUFFIX);
        let temp = PathBuf::from(temp_name);

        let written = File::create(&temp)
            .and_then(|mut file| {
                file.write_all(bytes)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&temp, &target));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        debug!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(())
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        let file = self.file_path(path)?;
        match fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.file_path(path)?.is_file())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Posix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_posix_basic_operations() {
        let temp_dir = TempDir::new().unwrap();
        let backend = PosixBackend::open(temp_dir.path()).unwrap();

        backend.write("tables/0/descriptor.bin", b"value1").unwrap();
        assert_eq!(
            backend.read("tables/0/descriptor.bin").unwrap(),
            b"value1".to_vec()
        );
        assert!(temp_dir.path().join("tables/0/descriptor.bin").is_file());
        assert!(!temp_dir.path().join("tables/0/descriptor.bin.tmp").exists());

        backend.delete("tables/0/descriptor.bin").unwrap();
        assert!(!backend.exists("tables/0/descriptor.bin").unwrap());
        assert!(backend
            .read("tables/0/descriptor.bin")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_posix_leading_slash_stays_under_root() {
        let temp_dir = TempDir::new().unwrap();
        let backend = PosixBackend::open(temp_dir.path()).unwrap();

        backend.write("/db_metadata.bin", b"root").unwrap();
        assert!(temp_dir.path().join("db_metadata.bin").is_file());
    }

    #[test]
    fn test_posix_rejects_parent_components() {
        let temp_dir = TempDir::new().unwrap();
        let backend = PosixBackend::open(temp_dir.path()).unwrap();

        assert!(backend.write("../outside.bin", b"x").is_err());
    }

    #[test]
    fn test_posix_failed_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let backend = PosixBackend::open(temp_dir.path()).unwrap();

        // "tables" becomes a non-empty directory, so renaming a file over it fails
        backend.write("tables/0/descriptor.bin", b"leaf").unwrap();
        assert!(backend.write("tables", b"clash").is_err());

        assert!(!temp_dir.path().join("tables.tmp").exists());
        assert!(temp_dir.path().join("tables/0/descriptor.bin").is_file());
    }

    #[test]
    fn test_posix_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let backend = PosixBackend::open(temp_dir.path()).unwrap();
            backend.write("jobs/3/descriptor.bin", b"persistent").unwrap();
        }

        let backend = PosixBackend::open(temp_dir.path()).unwrap();
        assert_eq!(
            backend.read("jobs/3/descriptor.bin").unwrap(),
            b"persistent".to_vec()
        );
    }
}
