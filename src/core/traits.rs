//! Core trait definitions for catalog persistence
//!
//! The catalog talks to its persistence layer only through `DataStorage`,
//! so the JSON data file can be swapped for another backend.

use crate::core::data::Store;
use crate::utils::error::AppResult;

/// Storage operations for the catalog
///
/// This trait defines the interface for loading and saving the whole store
/// from/to persistent storage.
pub trait DataStorage {
    /// Load the persisted store.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet, and
    /// `AppError::Decode` when the persisted document is corrupt.
    fn load_store(&self) -> AppResult<Option<Store>>;

    /// Replace the persisted store. Fails with `AppError::Write`.
    fn save_store(&self, store: &Store) -> AppResult<()>;

    /// Ensure the storage location exists
    fn ensure_storage_exists(&self) -> AppResult<()>;

    /// Human-readable location, for messages
    fn location(&self) -> String;
}
