//! Runtime configuration.
//!
//! Built once at startup from defaults, an optional TOML file and the process
//! environment, then handed by reference to every API client.

use crate::ConfigError;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Login value shipped in the sample `.env`; treated as "not configured".
pub const DATAFORSEO_PLACEHOLDER_LOGIN: &str = "your_email@example.com";

pub const ENV_TWITTER_API_KEY: &str = "TWITTER_API_KEY";
pub const ENV_TWITTER_USER_ID: &str = "TWITTER_USER_ID";
pub const ENV_CLAUDE_API_KEY: &str = "CLAUDE_API_KEY";
pub const ENV_CLAUDE_MODEL: &str = "CLAUDE_MODEL";
pub const ENV_DATAFORSEO_LOGIN: &str = "DATAFORSEO_LOGIN";
pub const ENV_DATAFORSEO_PASSWORD: &str = "DATAFORSEO_PASSWORD";
pub const ENV_REPORT_DIR: &str = "REPORT_DIR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub twitter_api_key: Option<String>,
    pub twitter_user_id: Option<String>,
    pub claude_api_key: Option<String>,
    pub claude_model: String,
    pub dataforseo_login: Option<String>,
    pub dataforseo_password: Option<String>,
    pub report_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            twitter_api_key: None,
            twitter_user_id: None,
            claude_api_key: None,
            claude_model: DEFAULT_CLAUDE_MODEL.to_string(),
            dataforseo_login: None,
            dataforseo_password: None,
            report_dir: PathBuf::from("."),
        }
    }
}

/// Basic-auth pair for the keyword metrics API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCredentials {
    pub login: String,
    pub password: String,
}

impl AppConfig {
    /// Defaults, then the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            let path = path.display().to_string();
            match source.kind() {
                ErrorKind::NotFound => ConfigError::FileNotFound { path },
                ErrorKind::PermissionDenied => ConfigError::PermissionDenied { path },
                _ => ConfigError::Unreadable { path, source },
            }
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay values from `lookup`. Blank values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup(ENV_TWITTER_API_KEY) {
            self.twitter_api_key = Some(value);
        }
        if let Some(value) = lookup(ENV_TWITTER_USER_ID) {
            self.twitter_user_id = Some(value);
        }
        if let Some(value) = lookup(ENV_CLAUDE_API_KEY) {
            self.claude_api_key = Some(value);
        }
        if let Some(value) = lookup(ENV_CLAUDE_MODEL) {
            self.claude_model = value;
        }
        if let Some(value) = lookup(ENV_DATAFORSEO_LOGIN) {
            self.dataforseo_login = Some(value);
        }
        if let Some(value) = lookup(ENV_DATAFORSEO_PASSWORD) {
            self.dataforseo_password = Some(value);
        }
        if let Some(value) = lookup(ENV_REPORT_DIR) {
            self.report_dir = PathBuf::from(value);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.claude_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "claude_model".to_string(),
                value: self.claude_model.clone(),
            });
        }
        Ok(())
    }

    /// `None` when either half is missing or the login is the sample placeholder.
    pub fn keyword_credentials(&self) -> Option<KeywordCredentials> {
        let login = self.dataforseo_login.as_deref().map(str::trim)?;
        let password = self.dataforseo_password.as_deref()?;
        if login.is_empty() || password.is_empty() || login == DATAFORSEO_PLACEHOLDER_LOGIN {
            return None;
        }
        Some(KeywordCredentials {
            login: login.to_string(),
            password: password.to_string(),
        })
    }
}
