//! Core runtime configuration.
//!
//! # Responsibility
//! - Parse the JSON configuration consumed by hosts and the CLI.
//! - Validate values once, at load time.
//! - Build logging settings and catalog collaborators from the result.

use crate::logging::{default_log_level, normalize_level, LogSettings};
use crate::service::catalog_service::CatalogOptions;
use crate::text::language::{
    is_valid_language_tag, normalize_language, FixedLanguageProvider, DEFAULT_LANGUAGE,
};
use crate::text::normalizer::DefaultStringNormalizer;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_DB_PATH: &str = "cloudbm.sqlite3";

/// Configuration loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Validated core configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    /// Fallback language for display text.
    pub default_language: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut config: CoreConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Logging settings derived from this config.
    pub fn log_settings(&self) -> LogSettings {
        match &self.log_dir {
            Some(dir) => LogSettings::directory(self.log_level.clone(), dir.clone()),
            None => LogSettings::stderr(self.log_level.clone()),
        }
    }

    /// Catalog collaborators: default normalizer plus a fixed fallback
    /// language.
    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            normalizer: Arc::new(DefaultStringNormalizer),
            language_provider: Arc::new(FixedLanguageProvider::new(&self.default_language)),
        }
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("db_path cannot be empty".to_string()));
        }

        self.log_level = normalize_level(&self.log_level)
            .map_err(ConfigError::Invalid)?
            .to_string();

        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }

        if !is_valid_language_tag(&self.default_language) {
            return Err(ConfigError::Invalid(format!(
                "default_language `{}` is not a locale tag",
                self.default_language
            )));
        }
        self.default_language = normalize_language(&self.default_language);
        Ok(())
    }
}
