// Catalog location configuration
// Every operation takes its paths from a CatalogConfig instead of a fixed location.

use std::path::{Path, PathBuf};
use crate::constants::{BACKUP_FILENAME, CATALOG_FILENAME, DOCUMENTS_FOLDER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Directory whose files are catalogued
    pub root: PathBuf,
    /// JSON catalog file
    pub catalog_path: PathBuf,
    /// Fixed-name copy of the previous catalog, overwritten on every save
    pub backup_path: PathBuf,
}

impl CatalogConfig {
    /// Default layout under a base directory:
    /// `documents/`, `documents.json` and `document_old.json` side by side.
    pub fn from_base_dir(base: &Path) -> Self {
        let catalog_path = base.join(CATALOG_FILENAME);
        Self {
            root: base.join(DOCUMENTS_FOLDER),
            backup_path: default_backup_path(&catalog_path),
            catalog_path,
        }
    }

    /// Explicit root and catalog; the backup sits next to the catalog.
    pub fn new(root: impl Into<PathBuf>, catalog_path: impl Into<PathBuf>) -> Self {
        let catalog_path = catalog_path.into();
        Self {
            root: root.into(),
            backup_path: default_backup_path(&catalog_path),
            catalog_path,
        }
    }

    pub fn with_backup_path(mut self, backup_path: impl Into<PathBuf>) -> Self {
        self.backup_path = backup_path.into();
        self
    }
}

/// Backup path for a catalog: `document_old.json` in the catalog's directory.
pub fn default_backup_path(catalog_path: &Path) -> PathBuf {
    catalog_path.with_file_name(BACKUP_FILENAME)
}
