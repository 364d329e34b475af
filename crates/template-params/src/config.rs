//! Processor configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::generator::{DEFAULT_USER_AGENT, RemoteValueGenerator};
use crate::registry::GeneratorRegistry;

/// Configuration values controlling template processing.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TEMPLATE_PARAMS")]
pub struct ProcessorSettings {
    /// Fixed seed for parameter generation. A fresh seed is drawn when unset.
    pub seed: Option<u64>,
    /// Remote value request timeout in seconds.
    #[ortho_config(default = 30)]
    pub fetch_timeout_secs: u64,
    /// User agent sent with remote value requests.
    pub user_agent: Option<String>,
}

impl ProcessorSettings {
    /// Return the remote fetch timeout.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Return the configured user agent, falling back to the default.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Build the standard registry with a remote client configured from
    /// these settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn build_registry(&self) -> Result<GeneratorRegistry, reqwest::Error> {
        let remote =
            RemoteValueGenerator::with_user_agent(self.fetch_timeout(), self.user_agent())?;
        Ok(GeneratorRegistry::standard(remote))
    }
}
