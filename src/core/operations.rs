//! Core operations implementation
//!
//! `Catalog` owns the in-memory store together with its storage backend.
//! Every mutation goes through it and is followed by a write of the whole
//! store. A failed write is reported but the mutation stays in memory.

use crate::core::data::{CatalogStats, Category, Record, RecordPatch, Store};
use crate::core::import;
use crate::core::traits::DataStorage;
use crate::storage::JsonFileStorage;
use crate::utils::error::{AppError, AppResult};
use crate::utils::search::Matcher;
use tracing::{debug, info, warn};

/// Main operations hub for catalog state
pub struct Catalog<S: DataStorage = JsonFileStorage> {
    store: Store,
    storage: S,
}

impl<S: DataStorage> Catalog<S> {
    /// Create a catalog with an empty store
    pub fn new(storage: S) -> Self {
        Self {
            store: Store::new(),
            storage,
        }
    }

    /// Replace the in-memory store with the persisted one.
    ///
    /// On a decode failure the current in-memory store is left untouched.
    pub fn load(&mut self) -> AppResult<()> {
        match self.storage.load_store() {
            Ok(Some(store)) => {
                debug!(location = %self.storage.location(), "catalog loaded");
                self.store = store;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                warn!(location = %self.storage.location(), error = %err, "failed to load catalog");
                Err(err)
            }
        }
    }

    /// Write the whole store to storage
    pub fn persist(&self) -> AppResult<()> {
        self.storage.ensure_storage_exists().map_err(|e| match e {
            AppError::Io(msg) => AppError::Write(msg),
            other => other,
        })?;
        self.storage.save_store(&self.store).inspect_err(|err| {
            warn!(location = %self.storage.location(), error = %err, "failed to persist catalog");
        })
    }

    /// Append a record to its category
    pub fn create(&mut self, record: Record) -> AppResult<()> {
        info!(category = record.category().key(), id = record.id(), "creating record");
        self.store.create(record);
        self.persist()
    }

    /// Merge a patch into an existing record.
    ///
    /// Returns `Ok(false)` without writing when no record has that id.
    pub fn update(&mut self, category: Category, id: &str, patch: &RecordPatch) -> AppResult<bool> {
        if !self.store.update(category, id, patch) {
            debug!(category = category.key(), id, "no record to update");
            return Ok(false);
        }
        info!(category = category.key(), id, "updated record");
        self.persist()?;
        Ok(true)
    }

    /// Remove a record. Returns the removed record, if any.
    pub fn delete(&mut self, category: Category, id: &str) -> AppResult<Option<Record>> {
        let removed = self.store.delete(category, id);
        if removed.is_some() {
            info!(category = category.key(), id, "deleted record");
            self.persist()?;
        }
        Ok(removed)
    }

    /// Replace the whole store with the converted contents of `text`.
    ///
    /// Nothing changes when the document cannot be parsed.
    pub fn import(&mut self, text: &str) -> AppResult<()> {
        let store = import::import_str(text)?;
        self.store = store;
        self.persist()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn records(&self, category: Category) -> Vec<Record> {
        self.store.records(category)
    }

    pub fn find(&self, category: Category, id: &str) -> Option<Record> {
        self.store.find(category, id)
    }

    pub fn lookup(&self, category: Option<Category>, matcher: &Matcher) -> Vec<Record> {
        self.store.lookup(category, matcher)
    }

    pub fn stats(&self) -> CatalogStats {
        self.store.stats()
    }

    /// Pretty JSON of the store in the data file layout
    pub fn export_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(&self.store)
            .map_err(|e| AppError::System(format!("Failed to serialize catalog: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::{Polarity, RecordFields, StarPatch};
    use std::path::Path;

    fn catalog_in(dir: &Path) -> Catalog {
        Catalog::new(JsonFileStorage::new(dir.join("data.json")))
    }

    fn star(name: &str) -> Record {
        RecordFields {
            name: Some(name.to_string()),
            ..Default::default()
        }
        .into_record(Category::Star)
    }

    #[test]
    fn test_mutations_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = catalog_in(dir.path());
        let record = star("Thiên Xung");
        let id = record.id().to_string();
        catalog.create(record).unwrap();

        let patch = RecordPatch::Star(StarPatch {
            yin_yang: Some(Polarity::Am),
            ..Default::default()
        });
        assert!(catalog.update(Category::Star, &id, &patch).unwrap());

        let mut reloaded = catalog_in(dir.path());
        reloaded.load().unwrap();
        assert_eq!(reloaded.store(), catalog.store());

        assert!(catalog.delete(Category::Star, &id).unwrap().is_some());
        let mut reloaded = catalog_in(dir.path());
        reloaded.load().unwrap();
        assert!(reloaded.records(Category::Star).is_empty());
    }

    #[test]
    fn test_update_missing_id_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = catalog_in(dir.path());

        let patch = RecordPatch::Star(StarPatch::default());
        assert!(!catalog.update(Category::Star, "missing", &patch).unwrap());
        assert!(!dir.path().join("data.json").exists());
    }

    #[test]
    fn test_failed_write_keeps_mutation_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = Catalog::new(JsonFileStorage::new(dir.path()));

        let record = star("Thiên Phụ");
        let err = catalog.create(record.clone()).unwrap_err();
        assert!(matches!(err, AppError::Write(_)));
        assert_eq!(catalog.records(Category::Star), vec![record]);
    }

    #[test]
    fn test_failed_load_keeps_current_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = catalog_in(dir.path());
        catalog.create(star("Thiên Tâm")).unwrap();
        let before = catalog.store().clone();

        std::fs::write(dir.path().join("data.json"), "not json").unwrap();
        assert!(matches!(catalog.load(), Err(AppError::Decode(_))));
        assert_eq!(catalog.store(), &before);
    }

    #[test]
    fn test_failed_import_keeps_current_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = catalog_in(dir.path());
        catalog.create(star("Thiên Trụ")).unwrap();
        let before = catalog.store().clone();

        let err = catalog.import("{not json").unwrap_err();
        assert!(matches!(err, AppError::ImportParse(_)));
        assert_eq!(catalog.store(), &before);
    }

    #[test]
    fn test_import_replaces_whole_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = catalog_in(dir.path());
        catalog.create(star("Thiên Trụ")).unwrap();

        catalog
            .import(r#"{"CáchCục":[{"id":"f1","name":"Phi Điểu Điệt Huyệt","auspiciousness":"Auspicious"}]}"#)
            .unwrap();

        assert!(catalog.records(Category::Star).is_empty());
        assert_eq!(catalog.records(Category::Formation).len(), 1);

        let mut reloaded = catalog_in(dir.path());
        reloaded.load().unwrap();
        assert_eq!(reloaded.store(), catalog.store());
    }

    #[test]
    fn test_export_json_matches_data_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = catalog_in(dir.path());
        catalog.create(star("Thiên Anh")).unwrap();

        let exported = catalog.export_json().unwrap();
        let on_disk = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert_eq!(exported, on_disk);
    }
}
