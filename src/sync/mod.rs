// Catalog sync pipeline
// scan -> load catalog -> diff by filename -> append records -> backup + save


use std::path::PathBuf;
use chrono::NaiveDateTime;
use crate::catalog::{load_catalog, save_catalog};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::reconcile::{find_unregistered_files, insert_files, insert_files_at};
use crate::scan::{duplicate_filenames, list_all_files};

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Report what would be added without writing anything
    pub dry_run: bool,
    /// Creation time for new records; the current local time when unset
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub discovered: Vec<PathBuf>,
    pub unregistered: Vec<PathBuf>,
    pub added_ids: Vec<i64>,
    pub saved: bool,
    pub backup_path: Option<PathBuf>,
    /// Why the scan produced nothing, when the root was unusable
    pub scan_error: Option<String>,
}

/// Run one sync against the configured root and catalog.
pub fn run_sync(config: &CatalogConfig, options: &SyncOptions) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    // An unusable root is reported, not fatal: the run continues with no files
    match list_all_files(&config.root) {
        Ok(files) => report.discovered = files,
        Err(CatalogError::InvalidInput(msg)) => {
            log::warn!("{}", msg);
            report.scan_error = Some(msg);
        }
        Err(e) => return Err(e),
    }

    for name in duplicate_filenames(&report.discovered) {
        log::warn!("Filename '{}' appears in more than one folder; only one can be catalogued", name);
    }

    let records = load_catalog(&config.catalog_path)?;
    report.unregistered = find_unregistered_files(&report.discovered, &records);

    if report.unregistered.is_empty() {
        log::info!("Catalog {} is up to date", config.catalog_path.display());
        return Ok(report);
    }

    let existing = records.len();
    let records = match options.created_at {
        Some(at) => insert_files_at(&report.unregistered, records, at)?,
        None => insert_files(&report.unregistered, records)?,
    };
    report.added_ids = records[existing..].iter().map(|r| r.id).collect();

    if options.dry_run {
        log::info!("Dry run: {} records not written", report.added_ids.len());
        return Ok(report);
    }

    let outcome = save_catalog(&records, &config.catalog_path, &config.backup_path)?;
    report.saved = true;
    report.backup_path = outcome.backup_path;

    Ok(report)
}
