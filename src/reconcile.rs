// Reconciliation: which files on disk have no catalog record, and records for them

use std::collections::HashSet;
use std::path::PathBuf;
use chrono::{Local, NaiveDateTime};
use crate::catalog::{max_id, CatalogRecord};
use crate::constants::CREATED_TIMESTAMP_FORMAT;
use crate::error::{CatalogError, Result};
use crate::scan::file_name_of;

/// Files whose base name matches no record's `filename`, in scan order.
/// Matching is exact: no case folding, directories are ignored.
pub fn find_unregistered_files(files: &[PathBuf], records: &[CatalogRecord]) -> Vec<PathBuf> {
    let known: HashSet<&str> = records.iter().map(|r| r.filename.as_str()).collect();

    files
        .iter()
        .filter(|f| match file_name_of(f) {
            Some(name) => !known.contains(name.as_str()),
            None => false,
        })
        .cloned()
        .collect()
}

/// Append a record for each unregistered file, stamped with the current local time.
pub fn insert_files(unregistered: &[PathBuf], records: Vec<CatalogRecord>) -> Result<Vec<CatalogRecord>> {
    insert_files_at(unregistered, records, Local::now().naive_local())
}

/// Same as [`insert_files`] with an explicit creation time.
/// Ids continue from the highest existing id, one per file in order.
pub fn insert_files_at(
    unregistered: &[PathBuf],
    mut records: Vec<CatalogRecord>,
    now: NaiveDateTime,
) -> Result<Vec<CatalogRecord>> {
    if unregistered.is_empty() {
        return Ok(records);
    }

    let base_id = max_id(&records);
    let created = format_created(now);

    records.reserve(unregistered.len());
    for (n, file) in unregistered.iter().enumerate() {
        let id = (n as i64)
            .checked_add(1)
            .and_then(|offset| base_id.checked_add(offset))
            .ok_or_else(|| {
                CatalogError::MalformedData(format!(
                    "No ids left after {} for {}",
                    base_id,
                    file.display()
                ))
            })?;
        let record = CatalogRecord::for_file(id, file, created.clone())?;
        log::debug!("New record {} for {}", id, file.display());
        records.push(record);
    }

    Ok(records)
}

/// ISO 8601, seconds precision, no offset
pub fn format_created(at: NaiveDateTime) -> String {
    at.format(CREATED_TIMESTAMP_FORMAT).to_string()
}
