use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use dashboard_domain::{RuntimeConfig, WebserviceClient};
use dashboard_infrastructure::{AppConfig, HttpWebserviceClient};

/// Resolved configuration plus the backend adapter built from it.
pub struct AppContext {
    pub config: RuntimeConfig,
    pub webservice: Arc<dyn WebserviceClient>,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load()
            .await
            .context("failed to load configuration")?
            .resolve()
            .context("invalid configuration")?;

        let webservice = HttpWebserviceClient::new(
            &config.webservice_url,
            Duration::from_secs(config.webservice_timeout_seconds),
        )
        .context("failed to build pa11y-webservice client")?;

        info!(
            port = config.port,
            webservice = %webservice.base_url(),
            readonly = config.readonly,
            noindex = config.noindex,
            deployment = config.deployment.as_str(),
            ip_restriction = config.access.ip_restriction.is_some(),
            basic_auth = config.access.basic_auth.is_some(),
            "configuration resolved"
        );

        Ok(Self {
            config,
            webservice: Arc::new(webservice),
        })
    }
}
