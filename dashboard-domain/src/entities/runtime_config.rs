// Resolved runtime configuration
// Built once at startup and shared read-only with every component

use crate::entities::access_policy::AccessPolicy;
use crate::value_objects::DeploymentMode;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_host: String,
    pub port: u16,
    pub webservice_url: String,
    pub webservice_database: Option<String>,
    pub webservice_cron: Option<String>,
    pub webservice_timeout_seconds: u64,
    pub noindex: bool,
    pub readonly: bool,
    pub site_message: Option<String>,
    pub deployment: DeploymentMode,
    pub access: AccessPolicy,
    pub public_dir: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl RuntimeConfig {
    pub fn bind_addr(&self) -> String {
        if self.bind_host.contains(':') {
            format!("[{}]:{}", self.bind_host, self.port)
        } else {
            format!("{}:{}", self.bind_host, self.port)
        }
    }

    pub fn exposes_error_detail(&self) -> bool {
        self.deployment.exposes_error_detail()
    }
}
