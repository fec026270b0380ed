// Catalog file persistence
// Load tolerates a missing file. Save backs up the previous catalog, then
// replaces it through a temp file + rename so a failed write never leaves
// a truncated catalog behind.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use crate::constants::{CATALOG_INDENT, TEMP_FILE_PREFIX};
use crate::error::{CatalogError, Result};
use super::CatalogRecord;

/// What a save did besides writing the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Set when a previous catalog existed and was copied aside
    pub backup_path: Option<PathBuf>,
}

/// Load a catalog. A missing file is an empty catalog.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogRecord>> {
    if !path.exists() {
        log::debug!("No catalog at {}, starting empty", path.display());
        return Ok(Vec::new());
    }

    let bytes = fs::read(path)?;
    let records: Vec<CatalogRecord> = serde_json::from_slice(&bytes).map_err(|e| {
        CatalogError::MalformedData(format!("{}: {}", path.display(), e))
    })?;

    log::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Encode records the way the catalog file stores them:
/// 4-space indentation, non-ASCII text written as-is.
pub fn to_catalog_json(records: &[CatalogRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(CATALOG_INDENT);
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    Ok(buf)
}

/// Save the full catalog to `path`, first copying any existing catalog to `backup_path`.
/// If the backup cannot be made the catalog is left untouched.
pub fn save_catalog(records: &[CatalogRecord], path: &Path, backup_path: &Path) -> Result<SaveOutcome> {
    // Encode before touching the filesystem
    let json = to_catalog_json(records)?;

    let mut outcome = SaveOutcome::default();
    if path.exists() {
        write_backup(path, backup_path)?;
        outcome.backup_path = Some(backup_path.to_path_buf());
    }

    write_atomic(path, &json)?;
    log::info!("Saved {} records to {}", records.len(), path.display());

    Ok(outcome)
}

/// Copy the current catalog aside and confirm the copy matches byte for byte.
fn write_backup(path: &Path, backup_path: &Path) -> Result<()> {
    if path == backup_path {
        return Err(CatalogError::Backup(format!(
            "Backup path is the catalog itself: {}",
            path.display()
        )));
    }

    fs::copy(path, backup_path)?;

    // Preserve modification time
    if let Ok(meta) = fs::metadata(path) {
        let mtime = filetime::FileTime::from_last_modification_time(&meta);
        if let Err(e) = filetime::set_file_mtime(backup_path, mtime) {
            log::debug!("Could not preserve mtime on {}: {}", backup_path.display(), e);
        }
    }

    let source_hash = hash_file(path)?;
    let backup_hash = hash_file(backup_path)?;
    if source_hash != backup_hash {
        return Err(CatalogError::Backup(format!(
            "{} does not match {} after copy",
            backup_path.display(),
            path.display()
        )));
    }

    log::debug!("Backed up {} to {}", path.display(), backup_path.display());
    Ok(())
}

fn hash_file(path: &Path) -> Result<blake3::Hash> {
    let mut file = fs::File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

/// Write to a sibling temp file, fsync, then rename over the destination.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CatalogError::InvalidInput(format!("No filename: {}", path.display())))?;
    let tmp_path = path.with_file_name(format!("{}{}", TEMP_FILE_PREFIX, file_name.to_string_lossy()));

    let result = write_and_rename(&tmp_path, path, data);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;

    // fsync parent directory (best-effort, not all platforms support it)
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if let Ok(dir) = fs::File::open(parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}

fn write_and_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> Result<()> {
    {
        let mut file = fs::File::create(tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn record(id: i64, filename: &str, tags: &[&str]) -> CatalogRecord {
        let mut r = CatalogRecord::for_file(id, Path::new(filename), "2024-03-09T14:05:59".to_string()).unwrap();
        r.tags = tags.iter().map(|t| t.to_string()).collect();
        r
    }

    #[test]
    fn test_missing_catalog_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let records = load_catalog(&tmp.path().join("documents.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_malformed_catalog_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");

        std::fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(load_catalog(&path), Err(CatalogError::MalformedData(_))));

        // Valid JSON, wrong shape
        std::fs::write(&path, br#"{"id": 1, "filename": "a.txt"}"#).unwrap();
        assert!(matches!(load_catalog(&path), Err(CatalogError::MalformedData(_))));

        // Record without a filename
        std::fs::write(&path, br#"[{"id": 1}]"#).unwrap();
        assert!(matches!(load_catalog(&path), Err(CatalogError::MalformedData(_))));
    }

    #[test]
    fn test_save_without_previous_catalog_makes_no_backup() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");
        let backup = tmp.path().join("document_old.json");

        let outcome = save_catalog(&[record(1, "a.txt", &[])], &path, &backup).unwrap();

        assert_eq!(outcome.backup_path, None);
        assert!(path.exists());
        assert!(!backup.exists());
    }

    #[test]
    fn test_backup_matches_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");
        let backup = tmp.path().join("document_old.json");

        // Hand-formatted catalog: backup must keep its exact bytes
        let previous = "[{\"id\":5,\"filename\":\"a.txt\",\"tags\":[\"論文\"]}]\n";
        std::fs::write(&path, previous).unwrap();

        let mut records = load_catalog(&path).unwrap();
        records.push(record(6, "c.csv", &[]));
        let outcome = save_catalog(&records, &path, &backup).unwrap();

        assert_eq!(outcome.backup_path, Some(backup.clone()));
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), previous);
        assert_eq!(load_catalog(&path).unwrap(), records);
    }

    #[test]
    fn test_backup_is_overwritten_each_save() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");
        let backup = tmp.path().join("document_old.json");

        save_catalog(&[record(1, "a.txt", &[])], &path, &backup).unwrap();
        let first = std::fs::read(&path).unwrap();
        save_catalog(&[record(1, "a.txt", &[]), record(2, "b.txt", &[])], &path, &backup).unwrap();
        assert_eq!(std::fs::read(&backup).unwrap(), first);

        let second = std::fs::read(&path).unwrap();
        save_catalog(&[record(1, "a.txt", &["x"])], &path, &backup).unwrap();
        assert_eq!(std::fs::read(&backup).unwrap(), second);
    }

    #[test]
    fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");
        let backup = tmp.path().join("document_old.json");

        let mut titled = record(9, "サンプル.pdf", &["仕事", "2024"]);
        titled.title = Some("年次報告".to_string());
        titled.updated = Some("2024-04-01T08:00:00".to_string());
        titled.extra.insert("note".to_string(), serde_json::json!({"k": [1, 2]}));
        let records = vec![record(3, "a.txt", &[]), titled, record(1, "noext", &["x"])];

        save_catalog(&records, &path, &backup).unwrap();
        assert_eq!(load_catalog(&path).unwrap(), records);
    }

    #[test]
    fn test_json_layout() {
        let json = to_catalog_json(&[record(1, "日本語.txt", &["タグ"])]).unwrap();
        let text = String::from_utf8(json).unwrap();

        let expected = concat!(
            "[\n",
            "    {\n",
            "        \"id\": 1,\n",
            "        \"filename\": \"日本語.txt\",\n",
            "        \"filetype\": \".txt\",\n",
            "        \"title\": null,\n",
            "        \"thumbnail\": null,\n",
            "        \"created\": \"2024-03-09T14:05:59\",\n",
            "        \"updated\": null,\n",
            "        \"tags\": [\n",
            "            \"タグ\"\n",
            "        ]\n",
            "    }\n",
            "]",
        );
        assert_eq!(text, expected);
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_failed_backup_leaves_catalog_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");
        let previous = b"[]";
        std::fs::write(&path, previous).unwrap();

        // Backup target inside a directory that does not exist
        let backup = tmp.path().join("missing").join("document_old.json");
        let err = save_catalog(&[record(1, "a.txt", &[])], &path, &backup).unwrap_err();

        assert!(err.is_io_failure());
        assert_eq!(std::fs::read(&path).unwrap(), previous);
    }

    #[test]
    fn test_backup_onto_catalog_is_refused() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");
        std::fs::write(&path, b"[]").unwrap();

        let err = save_catalog(&[record(1, "a.txt", &[])], &path, &path).unwrap_err();
        assert!(matches!(err, CatalogError::Backup(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn test_unwritable_destination_is_io_failure() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("no_such_dir").join("documents.json");
        let backup = tmp.path().join("document_old.json");

        let err = save_catalog(&[record(1, "a.txt", &[])], &path, &backup).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");
        let backup = tmp.path().join("document_old.json");

        save_catalog(&[record(1, "a.txt", &[])], &path, &backup).unwrap();
        save_catalog(&[record(1, "a.txt", &[])], &path, &backup).unwrap();

        for entry in std::fs::read_dir(tmp.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.starts_with(TEMP_FILE_PREFIX), "temp file left behind: {}", name);
        }
    }
}
