use std::env;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tokio::fs;
use tracing::warn;
use url::Url;

use dashboard_domain::{
    default_allowlist, AccessPolicy, AddressRange, AddressRangeError, BasicCredentials,
    DeploymentMode, IpRestriction, RuntimeConfig, DEFAULT_IP_REDIRECT_URL,
};

use crate::config::credentials::load_credentials;

pub const DEFAULT_AUTH_USER_FILE: &str = "./config/user.json";
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_PUBLIC_DIR: &str = "./public";
const DEFAULT_WEBSERVICE_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("port is required")]
    MissingPort,
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("webservice location is required (webservice_url, or webservice_host and webservice_port)")]
    MissingWebservice,
    #[error("invalid webservice url '{0}'")]
    InvalidWebserviceUrl(String),
    #[error("invalid allowed_ips entry: {0}")]
    InvalidAllowlist(#[from] AddressRangeError),
    #[error("{0} must be greater than 0")]
    ZeroLimit(&'static str),
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("private deployment requires credentials: {0}")]
    MissingCredentials(String),
    #[error("failed to read {path}: {reason}")]
    File { path: String, reason: String },
}

/// Partial configuration: every field may be absent until `resolve`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(deserialize_with = "string_or_number")]
    pub port: Option<String>,
    pub bind_host: Option<String>,
    pub noindex: Option<bool>,
    pub readonly: Option<bool>,
    pub site_message: Option<String>,
    pub webservice_url: Option<String>,
    pub webservice_host: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub webservice_port: Option<String>,
    pub webservice_database: Option<String>,
    pub webservice_cron: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub webservice_timeout_seconds: Option<String>,
    pub node_env: Option<String>,
    pub development: Option<bool>,
    pub public_dir: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub max_body_bytes: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub request_timeout_seconds: Option<String>,
    pub auth_user_file: Option<String>,
    pub auth_user: Option<String>,
    pub auth_pass: Option<String>,
    pub allowed_ips: Option<Vec<String>>,
    pub ip_redirect_url: Option<String>,
}

impl AppConfig {
    pub async fn load() -> Result<Self, ConfigError> {
        let path = env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path)
                .await
                .map_err(|err| ConfigError::File {
                    path: path.clone(),
                    reason: err.to_string(),
                })?;
            toml::from_str(&content).map_err(|err| ConfigError::File {
                path: path.clone(),
                reason: err.to_string(),
            })?
        } else {
            warn!("{} not found, using environment only", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.load_credentials_if_private().await?;
        Ok(config)
    }

    pub fn deployment(&self) -> DeploymentMode {
        self.node_env
            .as_deref()
            .map(DeploymentMode::from)
            .unwrap_or(DeploymentMode::Other)
    }

    pub fn normalize(&mut self) {
        for value in [
            &mut self.port,
            &mut self.bind_host,
            &mut self.site_message,
            &mut self.webservice_url,
            &mut self.webservice_host,
            &mut self.webservice_port,
            &mut self.webservice_database,
            &mut self.webservice_cron,
            &mut self.webservice_timeout_seconds,
            &mut self.node_env,
            &mut self.public_dir,
            &mut self.max_body_bytes,
            &mut self.request_timeout_seconds,
            &mut self.auth_user_file,
            &mut self.ip_redirect_url,
        ] {
            if value.as_deref().map(str::trim).is_some_and(str::is_empty) {
                *value = None;
            } else if let Some(raw) = value.as_mut() {
                *raw = raw.trim().to_string();
            }
        }
        if let Some(ips) = self.allowed_ips.take() {
            let ips = normalize_list(ips);
            if !ips.is_empty() {
                self.allowed_ips = Some(ips);
            }
        }
    }

    async fn load_credentials_if_private(&mut self) -> Result<(), ConfigError> {
        if self.deployment() != DeploymentMode::Private {
            return Ok(());
        }
        if self.auth_user.is_some() && self.auth_pass.is_some() {
            return Ok(());
        }
        let path = self
            .auth_user_file
            .clone()
            .unwrap_or_else(|| DEFAULT_AUTH_USER_FILE.to_string());
        let credentials = load_credentials(&path).await?;
        self.auth_user = Some(credentials.name);
        self.auth_pass = Some(credentials.pass);
        Ok(())
    }

    /// Fills defaults and checks everything the server needs. Pure.
    pub fn resolve(&self) -> Result<RuntimeConfig, ConfigError> {
        let raw_port = self.port.as_deref().ok_or(ConfigError::MissingPort)?;
        let port = parse_port(raw_port)?;
        let webservice_url = self.resolve_webservice_url()?;

        let webservice_timeout_seconds = parse_limit(
            "webservice_timeout_seconds",
            self.webservice_timeout_seconds.as_deref(),
            DEFAULT_WEBSERVICE_TIMEOUT_SECONDS,
        )?;
        let request_timeout_seconds = parse_limit(
            "request_timeout_seconds",
            self.request_timeout_seconds.as_deref(),
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
        )?;
        let max_body_bytes = parse_limit(
            "max_body_bytes",
            self.max_body_bytes.as_deref(),
            DEFAULT_MAX_BODY_BYTES,
        )?;
        if webservice_timeout_seconds == 0 {
            return Err(ConfigError::ZeroLimit("webservice_timeout_seconds"));
        }
        if request_timeout_seconds == 0 {
            return Err(ConfigError::ZeroLimit("request_timeout_seconds"));
        }
        if max_body_bytes == 0 {
            return Err(ConfigError::ZeroLimit("max_body_bytes"));
        }

        let deployment = self.deployment();
        Ok(RuntimeConfig {
            bind_host: self
                .bind_host
                .clone()
                .unwrap_or_else(|| DEFAULT_BIND_HOST.to_string()),
            port,
            webservice_url,
            webservice_database: self.webservice_database.clone(),
            webservice_cron: self.webservice_cron.clone(),
            webservice_timeout_seconds,
            noindex: self.noindex.unwrap_or(true),
            readonly: self.readonly.unwrap_or(false),
            site_message: self.site_message.clone(),
            deployment,
            access: self.resolve_access(deployment)?,
            public_dir: self
                .public_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_string()),
            max_body_bytes,
            request_timeout_seconds,
        })
    }

    fn resolve_webservice_url(&self) -> Result<String, ConfigError> {
        let raw = match (&self.webservice_url, &self.webservice_host, &self.webservice_port) {
            (Some(url), _, _) => url.clone(),
            (None, Some(host), Some(port)) => {
                let port = parse_port(port)?;
                if host.contains(':') {
                    format!("http://[{}]:{}/", host, port)
                } else {
                    format!("http://{}:{}/", host, port)
                }
            }
            _ => return Err(ConfigError::MissingWebservice),
        };
        let mut url =
            Url::parse(&raw).map_err(|_| ConfigError::InvalidWebserviceUrl(raw.clone()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::InvalidWebserviceUrl(raw));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url.to_string())
    }

    fn resolve_access(&self, deployment: DeploymentMode) -> Result<AccessPolicy, ConfigError> {
        let development = self.development.unwrap_or(false);
        let ip_restriction = if deployment != DeploymentMode::Private && !development {
            let allowed = match &self.allowed_ips {
                Some(entries) => entries
                    .iter()
                    .map(|entry| entry.parse::<AddressRange>())
                    .collect::<Result<Vec<_>, _>>()?,
                None => default_allowlist(),
            };
            Some(IpRestriction {
                allowed,
                redirect_to: self
                    .ip_redirect_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_IP_REDIRECT_URL.to_string()),
            })
        } else {
            None
        };

        let basic_auth = if deployment == DeploymentMode::Private {
            match (&self.auth_user, &self.auth_pass) {
                (Some(name), Some(pass)) => Some(BasicCredentials {
                    name: name.clone(),
                    pass: pass.clone(),
                }),
                _ => {
                    return Err(ConfigError::MissingCredentials(
                        "auth_user and auth_pass are not set".to_string(),
                    ))
                }
            }
        } else {
            None
        };

        Ok(AccessPolicy {
            ip_restriction,
            basic_auth,
        })
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("PORT") {
            self.port = Some(value);
        }
        if let Some(value) = lookup("BIND_HOST") {
            self.bind_host = Some(value);
        }
        if let Some(value) = lookup("NOINDEX") {
            self.noindex = Some(value.trim() != "false");
        }
        if let Some(value) = lookup("READONLY") {
            self.readonly = Some(value.trim() == "true");
        }
        if let Some(value) = lookup("SITE_MESSAGE") {
            self.site_message = Some(value);
        }
        if let Some(value) = lookup("WEBSERVICE_URL") {
            self.webservice_url = Some(value);
        }
        if let Some(value) = lookup("WEBSERVICE_HOST") {
            self.webservice_host = Some(value);
        }
        if let Some(value) = lookup("WEBSERVICE_PORT") {
            self.webservice_port = Some(value);
        }
        if let Some(value) = lookup("WEBSERVICE_DATABASE") {
            self.webservice_database = Some(value);
        }
        if let Some(value) = lookup("WEBSERVICE_CRON") {
            self.webservice_cron = Some(value);
        }
        if let Some(value) = lookup("WEBSERVICE_TIMEOUT_SECONDS") {
            self.webservice_timeout_seconds = Some(value);
        }
        if let Some(value) = lookup("NODE_ENV") {
            self.node_env = Some(value);
        }
        if let Some(value) = lookup("DEVELOPMENT") {
            self.development = Some(!value.trim().is_empty());
        }
        if let Some(value) = lookup("PUBLIC_DIR") {
            self.public_dir = Some(value);
        }
        if let Some(value) = lookup("MAX_BODY_BYTES") {
            self.max_body_bytes = Some(value);
        }
        if let Some(value) = lookup("REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = Some(value);
        }
        if let Some(value) = lookup("AUTH_USER_FILE") {
            self.auth_user_file = Some(value);
        }
        if let Some(value) = lookup("ALLOWED_IPS") {
            self.allowed_ips = Some(value.split(',').map(ToString::to_string).collect());
        }
        if let Some(value) = lookup("IP_REDIRECT_URL") {
            self.ip_redirect_url = Some(value);
        }
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

fn parse_limit(field: &'static str, raw: Option<&str>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

fn normalize_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = values
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    out.dedup();
    out
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }
    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    }))
}
