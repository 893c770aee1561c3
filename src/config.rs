//! Application configuration
//!
//! Read from `<config_dir>/delivery-notify/config.json` when it exists,
//! otherwise defaults apply. Command-line flags override individual values.
//!
//! ```json
//! {
//!   "window_hours": 3,
//!   "cooldown_secs": 60,
//!   "cooldown_scope": "per_row",
//!   "header_strategy": "strict",
//!   "channel_base_url": "https://wa.me",
//!   "templates": ["{greeting} {recipient}, ..."]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::manifest::{HeaderStrategy, LoadOptions};
use crate::notification::channels::whatsapp::DEFAULT_BASE_URL;
use crate::notification::{CooldownScope, TemplateCatalog, MAX_COOLDOWN};

/// Smallest delivery window accepted, in hours
pub const MIN_WINDOW_HOURS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Delivery window added to the estimated visit time
    pub window_hours: u32,
    /// Cooldown after each notify
    pub cooldown_secs: u64,
    pub cooldown_scope: CooldownScope,
    pub header_strategy: HeaderStrategy,
    /// Deep-link base URL
    pub channel_base_url: String,
    /// Custom templates replacing the built-in catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_hours: MIN_WINDOW_HOURS,
            cooldown_secs: 60,
            cooldown_scope: CooldownScope::default(),
            header_strategy: HeaderStrategy::default(),
            channel_base_url: DEFAULT_BASE_URL.to_string(),
            templates: None,
        }
    }
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("delivery-notify")
            .join("config.json")
    }

    /// Load `path`, or the default location when `None`
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if explicit {
                bail!("config file not found: {}", path.display());
            }
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.validate()?;

        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_hours < MIN_WINDOW_HOURS {
            bail!(
                "window_hours must be at least {} (got {})",
                MIN_WINDOW_HOURS,
                self.window_hours
            );
        }
        if self.cooldown_secs == 0 {
            bail!("cooldown_secs must be positive");
        }
        if self.cooldown_secs > MAX_COOLDOWN.as_secs() {
            bail!(
                "cooldown_secs must be at most {} (got {})",
                MAX_COOLDOWN.as_secs(),
                self.cooldown_secs
            );
        }
        if self.channel_base_url.trim().is_empty() {
            bail!("channel_base_url must not be empty");
        }
        if let Some(templates) = &self.templates {
            if templates.is_empty() {
                bail!("templates must contain at least one template");
            }
        }
        Ok(())
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::new(self.window_hours).with_strategy(self.header_strategy)
    }

    /// Configured catalog, or the built-in one
    pub fn catalog(&self) -> TemplateCatalog {
        self.templates
            .clone()
            .and_then(TemplateCatalog::new)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.window_hours, 2);
        assert_eq!(config.cooldown(), Duration::from_secs(60));
        assert_eq!(config.cooldown_scope, CooldownScope::Global);
        assert_eq!(config.header_strategy, HeaderStrategy::Strict);
        assert_eq!(config.channel_base_url, "https://wa.me");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(r#"{"window_hours": 4, "cooldown_scope": "per_row"}"#);
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.window_hours, 4);
        assert_eq!(config.cooldown_scope, CooldownScope::PerRow);
        assert_eq!(config.cooldown_secs, 60);
        assert_eq!(config.load_options().window_hours, 4);
    }

    #[test]
    fn test_header_strategy_from_file() {
        let file = write_config(r#"{"header_strategy": "sentinel"}"#);
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.load_options().strategy, HeaderStrategy::Sentinel);
    }

    #[test]
    fn test_window_below_minimum_rejected() {
        let file = write_config(r#"{"window_hours": 1}"#);
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("window_hours"));
    }

    #[test]
    fn test_cooldown_out_of_range_rejected() {
        let file = write_config(r#"{"cooldown_secs": 18446744073709551615}"#);
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("cooldown_secs"));

        let file = write_config(r#"{"cooldown_secs": 0}"#);
        assert!(AppConfig::load(Some(file.path())).is_err());

        let file = write_config(r#"{"cooldown_secs": 86400}"#);
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.cooldown(), MAX_COOLDOWN);
    }

    #[test]
    fn test_empty_templates_rejected() {
        let file = write_config(r#"{"templates": []}"#);
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_custom_templates() {
        let file = write_config(r#"{"templates": ["Hola {recipient}"]}"#);
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.catalog().templates(), &["Hola {recipient}".to_string()]);
        assert_eq!(AppConfig::default().catalog(), TemplateCatalog::builtin());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let file = write_config("{not json");
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }
}
