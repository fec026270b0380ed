// Catalog module
// A catalog is a JSON array of records, one per known file, in insertion order.

pub mod query;
pub mod store;

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{CatalogError, Result};
use crate::scan::{file_name_of, file_type_of};

pub use store::{load_catalog, save_catalog, to_catalog_json, SaveOutcome};

/// One catalogued file.
///
/// `title`, `thumbnail`, `updated` and `tags` are maintained by hand; this tool
/// only ever creates records and never rewrites an existing one. Fields it does
/// not know about are kept in `extra` so hand edits survive a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: i64,
    pub filename: String,
    #[serde(default)]
    pub filetype: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CatalogRecord {
    /// Fresh record for a file on disk. Only the base name is kept.
    pub fn for_file(id: i64, path: &Path, created: String) -> Result<Self> {
        let filename = file_name_of(path).ok_or_else(|| {
            CatalogError::InvalidInput(format!("No filename: {}", path.display()))
        })?;

        Ok(Self {
            id,
            filename,
            filetype: file_type_of(path),
            title: None,
            thumbnail: None,
            created,
            updated: None,
            tags: Vec::new(),
            extra: serde_json::Map::new(),
        })
    }
}

/// Highest id in the catalog, never below 0, so new ids start at 1 at the earliest
pub fn max_id(records: &[CatalogRecord]) -> i64 {
    records
        .iter()
        .map(|r| r.id)
        .fold(crate::constants::EMPTY_CATALOG_MAX_ID, i64::max)
}
