//! fengshui - A Rust-based Feng Shui reference catalog
//!
//! This library provides the core functionality for the catalog: typed
//! records for stars, gates, spirits and formations, the JSON data file,
//! the legacy importer, and the command-line front end.

pub mod cli;
pub mod config;
pub mod core;
pub mod manager;
pub mod storage;
pub mod utils;

// Re-export core types and traits for easier use
pub use crate::core::{
    data::{Auspiciousness, Category, Polarity, Record, RecordFields, RecordPatch, Store},
    import::import_str,
    operations::Catalog,
    traits::DataStorage,
};
pub use storage::JsonFileStorage;
pub use utils::error::{AppError, AppResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
