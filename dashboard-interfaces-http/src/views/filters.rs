use chrono::{DateTime, Utc};

/// Formats an RFC 3339 timestamp with a strftime pattern. Unparseable
/// input is echoed back so a bad date never breaks a page.
pub fn date_format(value: String, pattern: Option<String>) -> String {
    let pattern = pattern.unwrap_or_else(|| "%-d %B %Y".to_string());
    match DateTime::parse_from_rfc3339(&value) {
        Ok(date) => date.with_timezone(&Utc).format(&pattern).to_string(),
        Err(_) => value,
    }
}

/// Strips the scheme, a leading `www.` and a trailing slash.
pub fn simplify_url(value: String) -> String {
    let without_scheme = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(&value);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_string()
}
