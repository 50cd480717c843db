use tokio::fs;

use dashboard_domain::BasicCredentials;

use crate::config::app_config::ConfigError;

/// Reads `{ "name": ..., "pass": ... }` from disk.
pub async fn load_credentials(path: &str) -> Result<BasicCredentials, ConfigError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|err| ConfigError::MissingCredentials(format!("{}: {}", path, err)))?;
    let credentials: BasicCredentials = serde_json::from_str(&content)
        .map_err(|err| ConfigError::MissingCredentials(format!("{}: {}", path, err)))?;
    if credentials.name.trim().is_empty() || credentials.pass.is_empty() {
        return Err(ConfigError::MissingCredentials(format!(
            "{}: name and pass must not be empty",
            path
        )));
    }
    Ok(credentials)
}
