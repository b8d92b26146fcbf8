//! Harness configuration.
//!
//! Configuration is loaded from environment variables. Only the
//! operations-manager URL is required; everything else defaults to the
//! values the tile ships with.

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default relay application name. The relay's route is published as
/// `<relay_app>.<apps_domain>`.
pub const DEFAULT_RELAY_APP: &str = "app1";

/// Default port the target application listens on.
pub const DEFAULT_TARGET_PORT: u16 = 8080;

/// Harness configuration.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the operations-management service.
    pub opsmgr_url: String,

    /// Name of the relay application (subdomain under the apps domain).
    pub relay_app: String,

    /// Port the target application listens on.
    pub target_port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid target port configuration: {0}")]
    InvalidTargetPort(String),
}

impl HarnessConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let opsmgr_url = vars
            .get("OPSMGR_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("OPSMGR_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let relay_app = vars
            .get("RELAY_APP")
            .cloned()
            .unwrap_or_else(|| DEFAULT_RELAY_APP.to_string());

        let target_port = match vars.get("TARGET_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidTargetPort(format!("{}: {}", raw, e)))?,
            None => DEFAULT_TARGET_PORT,
        };

        Ok(Self {
            opsmgr_url,
            relay_app,
            target_port,
        })
    }

    /// Public base URL of the relay application under the given apps domain.
    pub fn relay_base_url(&self, apps_domain: &str) -> String {
        format!("http://{}.{}", self.relay_app, apps_domain)
    }
}
