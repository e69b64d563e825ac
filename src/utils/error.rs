use crate::utils::output::OutputStyle;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The saved data file is not a valid catalog document
    #[error("Saved data could not be read, it may be corrupted: {0}")]
    Decode(String),

    /// The data file could not be written
    #[error("Failed to save data, some changes may not be saved: {0}")]
    Write(String),

    /// An import document is not valid JSON or not shaped like a catalog
    #[error("Failed to import data: {0}. Please check the file and try again")]
    ImportParse(String),

    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("System error: {0}")]
    System(String),
}

/// Result type alias for consistent error handling across the application
pub type AppResult<T> = Result<T, AppError>;

pub enum FlowResult {
    NotFound {
        item_type: String,
        search_term: String,
    },
    EmptyList {
        item_type: String,
    },
    Cancelled(String),
    Success(String),
}

pub fn report_error(err: &AppError) {
    match err {
        AppError::Decode(_) | AppError::ImportParse(_) => {
            eprintln!("⚠️  {}", OutputStyle::warning(&err.to_string()));
        }
        AppError::Write(_) | AppError::FileRead(_) => {
            eprintln!("💾 {}", OutputStyle::error(&err.to_string()));
        }
        AppError::Config(msg) => {
            eprintln!("⚙️  {}", OutputStyle::error(&format!("Config: {}", msg)));
        }
        AppError::Io(msg) | AppError::System(msg) => {
            eprintln!("❌ {}", OutputStyle::error(msg));
        }
    }
}

pub fn handle_flow(flow: FlowResult) {
    match flow {
        FlowResult::NotFound {
            item_type,
            search_term,
        } => {
            let msg = format!("{} '{}' not found", item_type, search_term);
            println!("⚠️  {}", OutputStyle::warning(&msg));
        }
        FlowResult::EmptyList { item_type } => {
            let msg = format!("No {} found", item_type);
            println!("{}", OutputStyle::muted(&msg));
        }
        FlowResult::Cancelled(msg) => {
            println!("⏹️  {}", OutputStyle::muted(&msg));
        }
        FlowResult::Success(msg) => {
            println!("✅ {}", OutputStyle::success(&msg));
        }
    }
}
