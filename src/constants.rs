// Doccat Constants
// Default layout mirrors the document library this tool was written for.

// Paths
pub const DOCUMENTS_FOLDER: &str = "documents";
pub const CATALOG_FILENAME: &str = "documents.json";
pub const BACKUP_FILENAME: &str = "document_old.json";
pub const TEMP_FILE_PREFIX: &str = ".tmp_";

// Environment
pub const BASE_DIR_ENV: &str = "DOCCAT_BASE";

// Catalog encoding
pub const CATALOG_INDENT: &[u8] = b"    ";
pub const CREATED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Ids start after this value in an empty catalog
pub const EMPTY_CATALOG_MAX_ID: i64 = 0;
