// Import and export of the whole catalog

use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;

use crate::cli::{ExportArgs, ImportArgs};
use crate::config::Config;
use crate::core::data::Category;
use crate::core::import::read_import_file;
use crate::core::traits::DataStorage;
use crate::manager::open_catalog;
use crate::utils::error::AppError;
use crate::utils::format::export_file_name;
use crate::utils::{FlowResult, handle_flow};

pub async fn handle_import_command(config: &Config, args: &ImportArgs) -> Result<()> {
    let mut catalog = open_catalog(config);
    let text = read_import_file(&args.file).await?;

    catalog.import(&text)?;

    let summary = Category::ALL
        .iter()
        .map(|c| format!("{} {}", catalog.store().len(*c), c.label().to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ");
    handle_flow(FlowResult::Success(format!(
        "Data imported successfully ({}) into {}",
        summary,
        catalog.storage().location()
    )));
    Ok(())
}

pub fn handle_export_command(config: &Config, args: &ExportArgs) -> Result<()> {
    let catalog = open_catalog(config);
    let json = catalog.export_json()?;

    if args.stdout {
        println!("{}", json);
        return Ok(());
    }

    let path = args
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(export_file_name(Local::now())));

    std::fs::write(&path, json)
        .map_err(|e| AppError::Write(format!("{}: {}", path.display(), e)))?;

    handle_flow(FlowResult::Success(format!(
        "Exported {} entries to {}",
        catalog.stats().total_records,
        path.display()
    )));
    Ok(())
}
