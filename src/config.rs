//! Client configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file,
//! environment variables, and finally command-line flags (applied by the
//! binary).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_CONFIG_FILE: &str = "admin-console.toml";
pub const DEFAULT_STORE: &str = "database/session.json";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "API_BASE_URL";
pub const ENV_STORE: &str = "ADMIN_CONSOLE_STORE";
pub const ENV_LOCALE: &str = "ADMIN_CONSOLE_LOCALE";
pub const ENV_TIMEOUT: &str = "ADMIN_CONSOLE_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL that endpoint paths are appended to
    pub base_url: String,

    /// JSON file holding tokens and the locale preference
    pub store_path: PathBuf,

    /// Locale override; when unset the stored preference is used
    pub locale: Option<String>,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE),
            locale: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    store_path: Option<PathBuf>,
    locale: Option<String>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// Build the configuration from defaults, `file` (if it exists) and the environment.
    ///
    /// # Arguments
    /// * `file` - Path of the TOML file; a missing file is not an error
    ///
    /// # Returns
    /// * `ApiResult<Config>` - The merged configuration
    ///
    /// # Errors
    /// * Returns `ApiError::Config` if the file exists but cannot be read or parsed
    /// * Returns `ApiError::Config` if the timeout variable is not a number
    pub fn load(file: impl AsRef<Path>) -> ApiResult<Self> {
        let mut config = Config::default();

        let file = file.as_ref();
        if file.exists() {
            let raw = std::fs::read_to_string(file)
                .map_err(|e| ApiError::Config(format!("failed to read {}: {}", file.display(), e)))?;
            config.apply_toml(&raw)?;
            log::debug!("loaded configuration from {}", file.display());
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_toml(&mut self, raw: &str) -> ApiResult<()> {
        let parsed: FileConfig =
            toml::from_str(raw).map_err(|e| ApiError::Config(format!("invalid config file: {}", e)))?;

        if let Some(base_url) = parsed.base_url {
            self.base_url = base_url;
        }
        if let Some(store_path) = parsed.store_path {
            self.store_path = store_path;
        }
        if parsed.locale.is_some() {
            self.locale = parsed.locale;
        }
        if let Some(timeout) = parsed.timeout_secs {
            self.timeout_secs = timeout;
        }
        Ok(())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ApiResult<()> {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = base_url;
        }
        if let Some(store) = lookup(ENV_STORE).filter(|v| !v.is_empty()) {
            self.store_path = PathBuf::from(store);
        }
        if let Some(locale) = lookup(ENV_LOCALE).filter(|v| !v.is_empty()) {
            self.locale = Some(locale);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT).filter(|v| !v.is_empty()) {
            self.timeout_secs = timeout
                .parse()
                .map_err(|_| ApiError::Config(format!("{} must be a number of seconds", ENV_TIMEOUT)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ApiResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ApiError::Config("timeout must be at least one second".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
