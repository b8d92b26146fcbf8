//! Operations-manager deployment-info client.
//!
//! Wraps the single call the harness makes against the platform's
//! operations-management service: fetching the routing domain of the
//! installed deployment. Any failure here is fatal to a verification run;
//! without an apps domain there is nothing to verify.

use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Path the deployment-info document is served from.
const DEPLOYMENT_INFO_PATH: &str = "/api/v0/deployed/cf_info";

/// Deployment-info errors. All variants abort the run.
#[derive(Debug, Error)]
pub enum OpsManagerError {
    #[error("operations manager unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("operations manager returned status {status}")]
    RequestFailed { status: u16 },

    #[error("deployment info was not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("deployment info did not advertise an apps domain")]
    MissingAppsDomain,
}

/// Routing domain of one installed deployment, as reported by the
/// operations manager. Captured once per verification run, read-only
/// thereafter.
#[derive(Debug, Clone)]
pub struct DeploymentInfo {
    /// DNS suffix under which deployed application routes are published.
    pub apps_domain: String,
}

#[derive(Debug, Deserialize)]
struct DeploymentInfoBody {
    #[serde(default)]
    apps_domain: Option<String>,
}

/// Client for the operations-management service.
pub struct OpsManagerClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl OpsManagerClient {
    /// Create a new client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Fetch the deployment info for the installed tile.
    ///
    /// One outbound GET, no retries.
    pub async fn deployment_info(&self) -> Result<DeploymentInfo, OpsManagerError> {
        let url = format!("{}{}", self.base_url, DEPLOYMENT_INFO_PATH);

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpsManagerError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let info: DeploymentInfoBody = serde_json::from_str(&body)
            .map_err(|e| OpsManagerError::MalformedResponse(e.to_string()))?;

        match info.apps_domain {
            Some(domain) if !domain.is_empty() => {
                debug!(apps_domain = %domain, "resolved deployment info");
                Ok(DeploymentInfo {
                    apps_domain: domain,
                })
            }
            _ => Err(OpsManagerError::MissingAppsDomain),
        }
    }
}
