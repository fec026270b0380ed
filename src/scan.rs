// File discovery for catalog sync

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::error::{CatalogError, Result};

/// List every regular file below a directory, at any depth.
/// Directories themselves are never returned. Output is sorted by path.
pub fn list_all_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(CatalogError::InvalidInput(format!(
            "Directory not found: {}",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(CatalogError::InvalidInput(format!(
            "Not a directory: {}",
            root.display()
        )));
    }

    let mut files = Vec::new();

    // Symlinked directories are not descended; symlinks to files still count
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            // The root itself could not be read: nothing below it is known
            Err(e) if e.depth() == 0 => return Err(CatalogError::Io(e.into())),
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let path = entry.path();
        if path.is_file() {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    log::debug!("Discovered {} files under {}", files.len(), root.display());

    Ok(files)
}

/// Base name of a path as stored in the catalog's `filename` field
pub fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}

/// Extension with its leading dot, or an empty string.
/// `a.tar.gz` gives `.gz`; `.bashrc` and `notes.` give nothing.
pub fn file_type_of(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext),
        _ => String::new(),
    }
}

/// Base names that occur more than once in a scan, in first-seen order.
/// Only one of each can ever be matched by filename.
pub fn duplicate_filenames(files: &[PathBuf]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order = Vec::new();

    for file in files {
        let Some(name) = file_name_of(file) else { continue };
        let count = counts.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(name);
        }
    }

    order
}
