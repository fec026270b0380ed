// Doccat - Library Entry Point
// Keeps a JSON document catalog in step with the files in a library folder.

pub mod constants;
pub mod error;
pub mod config;
pub mod scan;
pub mod catalog;
pub mod reconcile;
pub mod sync;

pub use catalog::CatalogRecord;
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use sync::{run_sync, SyncOptions, SyncReport};
