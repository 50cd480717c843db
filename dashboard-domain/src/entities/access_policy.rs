// Access policy
// Decides per request whether a peer may reach the dashboard

use std::net::IpAddr;

use crate::value_objects::AddressRange;

pub const DEFAULT_IP_REDIRECT_URL: &str = "http://help.ucsf.edu/HelpApps/ipNetVerify.php";
pub const BASIC_AUTH_REALM: &str = "Authorization Required";

pub fn default_allowlist() -> Vec<AddressRange> {
    ["135.23.71.118", "70.36.226.29", "169.230.0.0/16", "128.218.0.0/16", "64.54.0.0/16"]
        .iter()
        .filter_map(|raw| raw.parse().ok())
        .collect()
}

#[derive(Debug, Clone)]
pub struct IpRestriction {
    pub allowed: Vec<AddressRange>,
    pub redirect_to: String,
}

impl IpRestriction {
    pub fn allows(&self, addr: IpAddr) -> bool {
        self.allowed.iter().any(|range| range.contains(addr))
    }
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
pub struct BasicCredentials {
    pub name: String,
    pub pass: String,
}

impl BasicCredentials {
    pub fn matches(&self, name: &str, pass: &str) -> bool {
        constant_time_eq(self.name.as_bytes(), name.as_bytes())
            & constant_time_eq(self.pass.as_bytes(), pass.as_bytes())
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("name", &self.name)
            .field("pass", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    pub ip_restriction: Option<IpRestriction>,
    pub basic_auth: Option<BasicCredentials>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(String),
    Challenge,
}

impl AccessPolicy {
    /// `peer` is the socket address of the caller, `supplied` the decoded
    /// Basic credentials if the request carried any. The IP stage runs first.
    pub fn evaluate(&self, peer: Option<IpAddr>, supplied: Option<(&str, &str)>) -> AccessDecision {
        if let Some(restriction) = &self.ip_restriction {
            let allowed = peer.map(|addr| restriction.allows(addr)).unwrap_or(false);
            if !allowed {
                return AccessDecision::Redirect(restriction.redirect_to.clone());
            }
        }
        if let Some(expected) = &self.basic_auth {
            let ok = supplied
                .map(|(name, pass)| expected.matches(name, pass))
                .unwrap_or(false);
            if !ok {
                return AccessDecision::Challenge;
            }
        }
        AccessDecision::Allow
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(raw: &str) -> Option<IpAddr> {
        Some(raw.parse().expect("ip"))
    }

    fn restricted() -> AccessPolicy {
        AccessPolicy {
            ip_restriction: Some(IpRestriction {
                allowed: default_allowlist(),
                redirect_to: DEFAULT_IP_REDIRECT_URL.to_string(),
            }),
            basic_auth: None,
        }
    }

    fn private() -> AccessPolicy {
        AccessPolicy {
            ip_restriction: None,
            basic_auth: Some(BasicCredentials {
                name: "admin".to_string(),
                pass: "secret".to_string(),
            }),
        }
    }

    #[test]
    fn open_policy_allows_everyone() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.evaluate(None, None), AccessDecision::Allow);
    }

    #[test]
    fn default_allowlist_covers_fixed_addresses_and_ranges() {
        let policy = restricted();
        for allowed in ["135.23.71.118", "70.36.226.29", "169.230.9.9", "128.218.255.1", "64.54.0.0"] {
            assert_eq!(policy.evaluate(ip(allowed), None), AccessDecision::Allow, "{allowed}");
        }
    }

    #[test]
    fn unknown_or_missing_peer_is_redirected() {
        let policy = restricted();
        let expected = AccessDecision::Redirect(DEFAULT_IP_REDIRECT_URL.to_string());
        assert_eq!(policy.evaluate(ip("8.8.8.8"), None), expected);
        assert_eq!(policy.evaluate(None, None), expected);
    }

    #[test]
    fn basic_auth_requires_exact_credentials() {
        let policy = private();
        assert_eq!(policy.evaluate(None, None), AccessDecision::Challenge);
        assert_eq!(
            policy.evaluate(None, Some(("admin", "wrong"))),
            AccessDecision::Challenge
        );
        assert_eq!(
            policy.evaluate(None, Some(("admin", "secret"))),
            AccessDecision::Allow
        );
    }

    #[test]
    fn ip_stage_runs_before_credentials() {
        let mut policy = restricted();
        policy.basic_auth = private().basic_auth;
        assert!(matches!(
            policy.evaluate(ip("8.8.8.8"), Some(("admin", "secret"))),
            AccessDecision::Redirect(_)
        ));
        assert_eq!(
            policy.evaluate(ip("169.230.1.1"), None),
            AccessDecision::Challenge
        );
    }

    #[test]
    fn credentials_debug_output_is_redacted() {
        let rendered = format!("{:?}", private().basic_auth.expect("creds"));
        assert!(!rendered.contains("secret"));
    }
}
