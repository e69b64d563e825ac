// Configuration operations

use crate::cli::ConfigCommands;
use crate::config::{Config, DATA_FILE_ENV};
use crate::utils;
use crate::utils::error::{AppError, AppResult};
use std::path::Path;

/// Run a config subcommand against the file the configuration was loaded from
pub fn handle_config_command(
    config: &Config,
    config_path: &Path,
    command: Option<ConfigCommands>,
) -> AppResult<()> {
    match command {
        Some(ConfigCommands::Show) => handle_show_command(config, config_path),
        Some(ConfigCommands::Open) => handle_open_command(config, config_path),
        Some(ConfigCommands::Reset) => handle_reset_command(config_path),
        None => handle_config_help(config_path),
    }
}

fn handle_show_command(config: &Config, config_path: &Path) -> AppResult<()> {
    println!("⚙️  Feng Shui Catalog Configuration");
    println!("==================================");
    println!("File: {}", config_path.display());

    println!("General:");
    println!("  Data file: {}", config.general.data_file.display());
    if std::env::var(DATA_FILE_ENV).is_ok() {
        println!("    (overridden by {})", DATA_FILE_ENV);
    }
    println!("  Editor: {}", config.general.editor);
    println!("  Color: {}", config.general.color);
    println!("  Description preview: {}", config.general.description_preview);
    println!(
        "  Search case sensitive: {}",
        config.general.search_case_sensitive
    );
    if let Some(format) = &config.general.format {
        println!("  Default format: {}", format);
    }

    Ok(())
}

fn handle_config_help(config_path: &Path) -> AppResult<()> {
    println!("⚙️  Configuration Management");
    println!("==========================");
    println!("Available configuration commands:");
    println!("  fengshui config show    - Show current configuration");
    println!("  fengshui config open    - Open configuration file in editor");
    println!("  fengshui config reset   - Reset configuration to defaults");
    println!();
    println!("Configuration file location: {}", config_path.display());
    Ok(())
}

fn handle_open_command(config: &Config, config_path: &Path) -> AppResult<()> {
    if !config_path.exists() {
        config.save_to(config_path)?;
    }

    println!("Opening configuration file in editor...");
    println!("File: {}", config_path.display());

    utils::edit_file_direct(config_path, Some(&config.general.editor))
        .map_err(|e| AppError::System(e.to_string()))
}

fn handle_reset_command(config_path: &Path) -> AppResult<()> {
    let confirmed = utils::prompt_yes_no(
        "Are you sure you want to reset configuration to defaults? This will overwrite your current settings.",
    )
    .map_err(|e| AppError::Io(e.to_string()))?;

    if confirmed {
        reset_config_file(config_path)?;
        println!("✓ Configuration reset to defaults!");
    } else {
        println!("Reset cancelled.");
    }
    Ok(())
}

/// Overwrite the config file with the default settings
fn reset_config_file(config_path: &Path) -> AppResult<Config> {
    let config = Config::default();
    config.save_to(config_path)?;
    Ok(config)
}
