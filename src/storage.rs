use crate::config::Config;
use crate::core::data::Store;
use crate::core::traits::DataStorage;
use crate::utils::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Catalog persisted as a single pretty-printed JSON document
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.general.data_file.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataStorage for JsonFileStorage {
    fn load_store(&self) -> AppResult<Option<Store>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "data file does not exist yet");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", self.path.display(), e)))?;

        // An empty file is treated like a missing one
        if content.trim().is_empty() {
            return Ok(None);
        }

        let mut store: Store =
            serde_json::from_str(&content).map_err(|e| AppError::Decode(e.to_string()))?;

        let generated = store.ensure_ids();
        if generated > 0 {
            warn!(generated, "generated identifiers for records without one");
        }

        Ok(Some(store))
    }

    fn save_store(&self, store: &Store) -> AppResult<()> {
        let content = serde_json::to_string_pretty(store)
            .map_err(|e| AppError::Write(format!("Failed to serialize catalog: {}", e)))?;

        std::fs::write(&self.path, content)
            .map_err(|e| AppError::Write(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), "catalog saved");
        Ok(())
    }

    fn ensure_storage_exists(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Io(format!(
                    "Failed to create data directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
