// Command handlers
pub mod config;    // Configuration management
pub mod crud;      // Create, show, edit, delete
pub mod query;     // Lookup and statistics
pub mod transfer;  // Import and export

use crate::config::Config;
use crate::core::operations::Catalog;
use crate::storage::JsonFileStorage;
use crate::utils::report_error;

/// Open the catalog named by the config and load its saved data.
///
/// A corrupt data file is reported and the catalog starts out empty.
pub fn open_catalog(config: &Config) -> Catalog {
    let mut catalog = Catalog::new(JsonFileStorage::from_config(config));
    if let Err(err) = catalog.load() {
        report_error(&err);
    }
    catalog
}
