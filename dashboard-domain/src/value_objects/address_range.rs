// Address range value object
// One allowlist entry: a single address or a CIDR prefix, IPv4 or IPv6

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressRangeError {
    #[error("invalid address '{0}'")]
    Address(String),
    #[error("invalid prefix length in '{0}'")]
    Prefix(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    network: IpAddr,
    prefix: u8,
}

impl AddressRange {
    pub fn new(network: IpAddr, prefix: u8) -> Result<Self, AddressRangeError> {
        if prefix > max_prefix(&network) {
            return Err(AddressRangeError::Prefix(format!("{}/{}", network, prefix)));
        }
        Ok(Self {
            network: mask(network, prefix),
            prefix,
        })
    }

    pub fn single(addr: IpAddr) -> Self {
        Self {
            network: addr,
            prefix: max_prefix(&addr),
        }
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        let addr = canonical(addr);
        match (self.network, addr) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {
                mask(addr, self.prefix) == self.network
            }
            _ => false,
        }
    }
}

impl FromStr for AddressRange {
    type Err = AddressRangeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (addr, prefix) = match raw.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (raw, None),
        };
        let network: IpAddr = addr
            .trim()
            .parse()
            .map_err(|_| AddressRangeError::Address(raw.to_string()))?;
        let network = canonical(network);
        match prefix {
            None => Ok(Self::single(network)),
            Some(prefix) => {
                let prefix: u8 = prefix
                    .trim()
                    .parse()
                    .map_err(|_| AddressRangeError::Prefix(raw.to_string()))?;
                Self::new(network, prefix)
            }
        }
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

fn max_prefix(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

// Peers reached over a dual-stack socket show up as ::ffff:a.b.c.d
fn canonical(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

fn mask(addr: IpAddr, prefix: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4);
            let masked = if prefix == 0 {
                0
            } else {
                bits & (u32::MAX << (32 - u32::from(prefix)))
            };
            IpAddr::V4(masked.into())
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6);
            let masked = if prefix == 0 {
                0
            } else {
                bits & (u128::MAX << (128 - u32::from(prefix)))
            };
            IpAddr::V6(masked.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(raw: &str) -> IpAddr {
        raw.parse().expect("ip")
    }

    #[test]
    fn slash_16_covers_whole_block() {
        let range: AddressRange = "169.230.0.0/16".parse().expect("range");
        assert!(range.contains(ip("169.230.0.0")));
        assert!(range.contains(ip("169.230.255.255")));
        assert!(range.contains(ip("169.230.17.4")));
        assert!(!range.contains(ip("169.231.0.1")));
        assert!(!range.contains(ip("10.0.0.1")));
    }

    #[test]
    fn bare_address_is_exact_match() {
        let range: AddressRange = "135.23.71.118".parse().expect("range");
        assert!(range.contains(ip("135.23.71.118")));
        assert!(!range.contains(ip("135.23.71.119")));
    }

    #[test]
    fn network_bits_are_normalised() {
        let range: AddressRange = "128.218.44.9/16".parse().expect("range");
        assert_eq!(range.to_string(), "128.218.0.0/16");
    }

    #[test]
    fn mapped_ipv6_peer_matches_ipv4_range() {
        let range: AddressRange = "64.54.0.0/16".parse().expect("range");
        assert!(range.contains(ip("::ffff:64.54.3.2")));
    }

    #[test]
    fn ipv6_prefix_membership() {
        let range: AddressRange = "2001:db8::/32".parse().expect("range");
        assert!(range.contains(ip("2001:db8:1::1")));
        assert!(!range.contains(ip("2001:db9::1")));
        assert!(!range.contains(ip("127.0.0.1")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            "300.1.1.1".parse::<AddressRange>(),
            Err(AddressRangeError::Address(_))
        ));
        assert!(matches!(
            "10.0.0.0/33".parse::<AddressRange>(),
            Err(AddressRangeError::Prefix(_))
        ));
        assert!(matches!(
            "10.0.0.0/x".parse::<AddressRange>(),
            Err(AddressRangeError::Prefix(_))
        ));
    }
}
