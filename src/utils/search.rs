use crate::utils::error::{AppError, AppResult};
use regex::{Regex, RegexBuilder};

/// Text matcher used by catalog lookups
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Matches every record
    All,
    Substring {
        needle: String,
        case_sensitive: bool,
    },
    Pattern(Regex),
}

impl Matcher {
    pub fn substring(needle: &str, case_sensitive: bool) -> Self {
        let needle = if case_sensitive {
            needle.to_string()
        } else {
            needle.to_lowercase()
        };
        Matcher::Substring {
            needle,
            case_sensitive,
        }
    }

    pub fn pattern(pattern: &str, case_sensitive: bool) -> AppResult<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| AppError::System(format!("Invalid search pattern '{}': {}", pattern, e)))?;
        Ok(Matcher::Pattern(regex))
    }

    /// Build a matcher from an optional query; no query matches everything
    pub fn from_query(query: Option<&str>, regex: bool, case_sensitive: bool) -> AppResult<Self> {
        match query.map(str::trim) {
            None | Some("") => Ok(Matcher::All),
            Some(q) if regex => Self::pattern(q, case_sensitive),
            Some(q) => Ok(Self::substring(q, case_sensitive)),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Substring {
                needle,
                case_sensitive: true,
            } => text.contains(needle.as_str()),
            Matcher::Substring { needle, .. } => text.to_lowercase().contains(needle.as_str()),
            Matcher::Pattern(regex) => regex.is_match(text),
        }
    }
}
