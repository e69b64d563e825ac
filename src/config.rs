use crate::utils::error::{AppError, AppResult};
use crate::utils::interactive::detect_editor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `general.data_file`
pub const DATA_FILE_ENV: &str = "FENGSHUI_DATA_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_file: PathBuf,
    pub editor: String,
    pub color: bool,
    #[serde(default = "default_true")]
    pub description_preview: bool,
    #[serde(default)]
    pub search_case_sensitive: bool,
    #[serde(default)]
    pub format: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig {
                data_file: Self::config_dir().join("data.json"),
                editor: detect_editor(None),
                color: true,
                description_preview: true,
                search_case_sensitive: false,
                format: None,
            },
        }
    }
}

impl Config {
    pub fn load_custom(config_path: &Path) -> AppResult<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| AppError::Io(e.to_string()))?;
            Self::from_toml(&content)?
        } else {
            let default_config = Config::default();
            default_config.save_to(config_path)?;
            default_config
        };

        if let Ok(data_file) = std::env::var(DATA_FILE_ENV)
            && !data_file.trim().is_empty()
        {
            config.general.data_file = PathBuf::from(data_file);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.general.editor.trim().is_empty() {
            return Err(AppError::Config("Editor cannot be empty".to_string()));
        }

        if !self
            .general
            .data_file
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            return Err(AppError::Config(format!(
                "Data file should have a .json extension: {}",
                self.general.data_file.display()
            )));
        }

        Ok(())
    }

    /// Turn colored output on or off for the whole process
    pub fn apply_color(&self) {
        if !self.general.color {
            colored::control::set_override(false);
        }
    }

    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        if let Some(parent) = config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Io(e.to_string()))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content).map_err(|e| AppError::Io(e.to_string()))?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fengshui")
    }

    pub fn config_file_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
