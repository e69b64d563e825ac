//! Core business logic layer
//!
//! This module contains the catalog data structures, the legacy importer,
//! the storage trait and the `Catalog` that ties them together.

pub mod data;
pub mod import;
pub mod operations;
pub mod traits;
