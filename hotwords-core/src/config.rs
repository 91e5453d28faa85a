//! TOML configuration for the listing client and paginator.
//!
//! Every field has a default, so an absent file or an empty table is valid.
//! Environment overrides are applied after the file is read and before
//! validation.

use crate::error::ConfigError;
use crate::types::MAX_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const ENV_BASE_URL: &str = "HOTWORDS_BASE_URL";
pub const ENV_USER_AGENT: &str = "HOTWORDS_USER_AGENT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix for `<base_url>/<subreddit>/hot.json`.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com/r".to_string(),
            user_agent: "hotwords/0.1 (keyword frequency report)".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: u32,
    /// Safety bound: a chain longer than this is treated as a failure.
    pub max_pages: usize,
    /// Page size for the single-page listing mode.
    pub top_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            max_pages: 1000,
            top_limit: 10,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads the file at `path` (defaults when `None`), applies environment
    /// overrides and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                let contents =
                    std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidValue {
                        field: "config".to_string(),
                        value: format!("{}: {}", path.display(), e),
                    })?;
                debug!("Loaded configuration from {}", path.display());
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            debug!("Overriding api.base_url from {}", ENV_BASE_URL);
            self.api.base_url = base_url;
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            debug!("Overriding api.user_agent from {}", ENV_USER_AGENT);
            self.api.user_agent = user_agent;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.api.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            value: format!("{} ({})", self.api.base_url, e),
        })?;

        if self.api.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "api.user_agent must not be empty".to_string(),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }

        for (field, value) in [
            ("pagination.page_size", self.pagination.page_size),
            ("pagination.top_limit", self.pagination.top_limit),
        ] {
            if value == 0 || value > MAX_PAGE_SIZE {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: format!("{} (expected 1..={})", value, MAX_PAGE_SIZE),
                });
            }
        }

        if self.pagination.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.max_pages".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pagination.page_size, 100);
        assert_eq!(config.pagination.top_limit, 10);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [pagination]
            max_pages = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.pagination.max_pages, 5);
        assert_eq!(config.pagination.page_size, 100);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_page_size_over_cap_is_rejected() {
        let mut config = AppConfig::default();
        config.pagination.page_size = 250;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "pagination.page_size"));
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        let mut config = AppConfig::default();
        config.api.base_url = "not a url".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_overrides_replace_api_fields() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| match name {
            ENV_USER_AGENT => Some("tester/1.0".to_string()),
            _ => None,
        });

        assert_eq!(config.api.user_agent, "tester/1.0");
        assert_eq!(config.api.base_url, ApiConfig::default().base_url);
    }

    #[test]
    fn test_load_missing_file() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\ntimeout_secs = 5").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn test_malformed_toml() {
        let result = AppConfig::from_toml_str("[pagination\npage_size = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
