// Doccat Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Scan target is missing or is not a directory
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Catalog cannot be parsed, or a record cannot be serialized back
    #[error("Malformed catalog data: {0}")]
    MalformedData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backup failed: {0}")]
    Backup(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            CatalogError::Io(std::io::Error::from(err))
        } else {
            CatalogError::MalformedData(err.to_string())
        }
    }
}

impl CatalogError {
    /// True for the IOFailure class: backup or catalog write problems.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, CatalogError::Io(_) | CatalogError::Backup(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
