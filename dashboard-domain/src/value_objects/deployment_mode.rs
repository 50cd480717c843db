// Deployment mode value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentMode {
    Production,
    Private,
    Other,
}

impl DeploymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Production => "production",
            DeploymentMode::Private => "private",
            DeploymentMode::Other => "other",
        }
    }

    /// Raw error messages are only shown outside production.
    pub fn exposes_error_detail(&self) -> bool {
        !matches!(self, DeploymentMode::Production)
    }
}

impl From<&str> for DeploymentMode {
    fn from(s: &str) -> Self {
        match s.trim() {
            "production" => DeploymentMode::Production,
            "private" => DeploymentMode::Private,
            _ => DeploymentMode::Other,
        }
    }
}
