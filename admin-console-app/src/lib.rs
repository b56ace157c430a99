//! Platform-agnostic bootstrap for the admin console.
//!
//! Provides `ConsoleConfig` (defaults, config file, environment),
//! `init_logging`, and `ConsoleApp`, which owns the shared API client and
//! builds one CRUD page per entity type and company.

pub mod config;
pub mod logging;

use std::sync::Arc;

use anyhow::Context;

use admin_console_api::AdminApiClient;
use admin_console_core::services::{
    administrator_page, api_key_page, AdministratorPage, ApiKeyPage,
};

pub use config::ConsoleConfig;
pub use logging::{init_logging, init_logging_with};

/// Application state shared by every page.
pub struct ConsoleApp {
    config: ConsoleConfig,
    client: Arc<AdminApiClient>,
}

impl ConsoleApp {
    pub fn new(config: ConsoleConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let client = AdminApiClient::builder(config.backend_base_url.clone())
            .timeout(config.request_timeout())
            .max_retries(config.max_retries)
            .build()
            .context("failed to build the API client")?;
        log::info!("Admin console backend: {}", config.backend_base_url);
        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    /// Load the configuration from its default location and the environment.
    pub fn from_default_config() -> anyhow::Result<Self> {
        Self::new(ConsoleConfig::load(None)?)
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<AdminApiClient> {
        &self.client
    }

    /// A fresh administrators page for `company_id`. Dispose it on navigation.
    pub fn administrator_page(&self, company_id: i64, auth_token: &str) -> AdministratorPage {
        administrator_page(
            &self.client,
            company_id,
            auth_token,
            self.config.dedupe_interval(),
        )
        .with_page_size(self.config.page_size)
    }

    /// A fresh API keys page for `company_id`. Dispose it on navigation.
    pub fn api_key_page(&self, company_id: i64, auth_token: &str) -> ApiKeyPage {
        api_key_page(
            &self.client,
            company_id,
            auth_token,
            self.config.dedupe_interval(),
        )
        .with_page_size(self.config.page_size)
    }
}
