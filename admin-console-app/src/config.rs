//! Console configuration
//!
//! Load order: built-in defaults, then the JSON config file, then
//! environment variables. A missing file is fine; a malformed one is not.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use admin_console_api::MAX_PAGE_SIZE;

pub const ENV_BACKEND_URL: &str = "ADMIN_CONSOLE_BACKEND_URL";
pub const ENV_PAGE_SIZE: &str = "ADMIN_CONSOLE_PAGE_SIZE";
pub const ENV_REQUEST_TIMEOUT: &str = "ADMIN_CONSOLE_REQUEST_TIMEOUT";

const CONFIG_DIR_NAME: &str = "admin-console";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleConfig {
    pub backend_base_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    /// Retries of list calls on transient failures.
    pub max_retries: u32,
    pub dedupe_interval_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8080".to_string(),
            page_size: 25,
            request_timeout_secs: 30,
            max_retries: 2,
            dedupe_interval_ms: 2000,
        }
    }
}

impl ConsoleConfig {
    /// `<config dir>/admin-console/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path` (or the default location) and the process environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let mut config = match path {
            Some(path) => Self::from_file(&path)?.unwrap_or_default(),
            None => {
                log::debug!("No config directory on this platform, using defaults");
                Self::default()
            }
        };
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// `Ok(None)` when the file does not exist.
    pub fn from_file(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            log::debug!("Config file {} not found", path.display());
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("malformed config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// Override fields from environment variables.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(url) = env(ENV_BACKEND_URL) {
            self.backend_base_url = url;
        }
        if let Some(size) = env(ENV_PAGE_SIZE) {
            self.page_size = size
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PAGE_SIZE} must be a number, got '{size}'"))?;
        }
        if let Some(secs) = env(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{ENV_REQUEST_TIMEOUT} must be a number, got '{secs}'"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.backend_base_url.trim().is_empty(),
            "backendBaseUrl must not be empty"
        );
        ensure!(
            (1..=MAX_PAGE_SIZE).contains(&self.page_size),
            "pageSize must be between 1 and {MAX_PAGE_SIZE}, got {}",
            self.page_size
        );
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn dedupe_interval(&self) -> Duration {
        Duration::from_millis(self.dedupe_interval_ms)
    }
}
