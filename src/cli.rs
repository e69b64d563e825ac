use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use anyhow::Result;
use crate::config::Config;
use crate::core::data::{Auspiciousness, Category, Polarity, RecordFields};
use crate::manager::{config as config_manager, crud, query, transfer};

#[derive(Parser)]
#[command(name = "fengshui")]
#[command(about = "A Feng Shui reference catalog: stars, gates, spirits and formations")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Print diagnostic logs to stderr")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Commands {
    pub async fn execute(self, config: Config, config_path: &Path) -> Result<()> {
        match self {
            Commands::New(args) => crud::handle_new_command(&config, args)?,
            Commands::Edit(args) => crud::handle_edit_command(&config, args)?,
            Commands::Delete(args) => crud::handle_delete_command(&config, &args)?,
            Commands::Show(args) => crud::handle_show_command(&config, &args)?,
            Commands::Lookup(args) => query::handle_lookup_command(&config, &args)?,
            Commands::Stats => query::handle_stats_command(&config)?,
            Commands::Import(args) => transfer::handle_import_command(&config, &args).await?,
            Commands::Export(args) => transfer::handle_export_command(&config, &args)?,
            Commands::Config(args) => {
                config_manager::handle_config_command(&config, config_path, args.command)?
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enter a new entry
    New(NewArgs),

    /// Edit an existing entry
    Edit(EditArgs),

    /// Delete an entry
    Delete(DeleteArgs),

    /// Show one entry in full
    Show(ShowArgs),

    /// Look entries up by category and text
    Lookup(LookupArgs),

    /// Show entry counts
    Stats,

    /// Replace the catalog with the contents of a JSON file
    Import(ImportArgs),

    /// Write the catalog to a JSON file
    Export(ExportArgs),

    /// Configuration management
    Config(ConfigArgs),
}

/// Field values shared by `new` and `edit`
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    #[arg(short = 'e', long, help = "Five-element value (Kim, Mộc, Thủy, Hỏa, Thổ)")]
    pub element: Option<String>,

    #[arg(short = 'y', long, value_enum, help = "Star polarity")]
    pub yin_yang: Option<Polarity>,

    #[arg(short = 'a', long, value_enum, help = "Formation auspiciousness")]
    pub auspiciousness: Option<Auspiciousness>,

    #[arg(short = 'D', long)]
    pub description: Option<String>,
}

impl From<FieldArgs> for RecordFields {
    fn from(args: FieldArgs) -> Self {
        RecordFields {
            name: args.name,
            element: args.element,
            yin_yang: args.yin_yang,
            auspiciousness: args.auspiciousness,
            description: args.description,
        }
    }
}

#[derive(Args)]
pub struct NewArgs {
    #[arg(help = "star, gate, spirit or formation")]
    pub category: Category,

    #[command(flatten)]
    pub fields: FieldArgs,

    #[arg(long, help = "Write the description in the configured editor")]
    pub editor: bool,
}

#[derive(Args)]
pub struct EditArgs {
    pub category: Category,

    #[arg(help = "Entry ID")]
    pub id: String,

    #[command(flatten)]
    pub fields: FieldArgs,

    #[arg(long, help = "Edit the description in the configured editor")]
    pub editor: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub category: Category,

    #[arg(help = "Entry ID")]
    pub id: String,

    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub category: Category,

    #[arg(help = "Entry ID")]
    pub id: String,
}

#[derive(Args)]
pub struct LookupArgs {
    #[arg(help = "Limit to one category")]
    pub category: Option<Category>,

    #[arg(short = 'q', long)]
    pub query: Option<String>,

    #[arg(long, help = "Treat the query as a regular expression")]
    pub regex: bool,

    #[arg(short, long, value_enum)]
    pub format: Option<ListFormat>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(help = "JSON file to import")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(help = "File to export to (defaults to a timestamped file)")]
    pub file: Option<PathBuf>,

    #[arg(long, conflicts_with = "file")]
    pub stdout: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum ListFormat {
    Simple,
    Detailed,
    Table,
    Json,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Open,

    /// Reset configuration to defaults
    Reset,
}
