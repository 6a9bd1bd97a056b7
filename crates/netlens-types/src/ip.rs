//! Interface addresses.
//!
//! Collectors report interface addresses as CIDR strings with the host bits
//! kept (`10.0.0.1/31`). [`IpPrefix`] parses that form; [`IpAddress`] is the
//! bare address.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// An IPv4 or IPv6 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IpAddress(IpAddr);

impl IpAddress {
    pub const fn inner(&self) -> IpAddr {
        self.0
    }

    pub const fn is_ipv6(&self) -> bool {
        self.0.is_ipv6()
    }

    /// True for IPv6 link-local addresses (fe80::/10), never for IPv4.
    pub fn is_link_local(&self) -> bool {
        match self.0 {
            IpAddr::V4(_) => false,
            IpAddr::V6(addr) => addr.segments()[0] & 0xffc0 == 0xfe80,
        }
    }

    const fn max_prefix_len(&self) -> u8 {
        match self.0 {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        }
    }

    /// The address with everything past `prefix_len` bits cleared.
    fn masked(&self, prefix_len: u8) -> IpAddr {
        match self.0 {
            IpAddr::V4(addr) => {
                let bits = u32::from(addr);
                let mask = u32::MAX.checked_shl(32 - u32::from(prefix_len)).unwrap_or(0);
                IpAddr::from((bits & mask).to_be_bytes())
            }
            IpAddr::V6(addr) => {
                let bits = u128::from(addr);
                let mask = u128::MAX.checked_shl(128 - u32::from(prefix_len)).unwrap_or(0);
                IpAddr::from((bits & mask).to_be_bytes())
            }
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for IpAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<IpAddr>()
            .map(IpAddress)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
    }
}

impl From<IpAddr> for IpAddress {
    fn from(addr: IpAddr) -> Self {
        IpAddress(addr)
    }
}

/// An interface address with its prefix length, host bits preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpPrefix {
    address: IpAddress,
    prefix_len: u8,
}

impl IpPrefix {
    pub fn new(address: IpAddress, prefix_len: u8) -> Result<Self, ParseError> {
        if prefix_len > address.max_prefix_len() {
            return Err(ParseError::InvalidIpPrefix(format!("{}/{}", address, prefix_len)));
        }
        Ok(IpPrefix {
            address,
            prefix_len,
        })
    }

    pub const fn address(&self) -> &IpAddress {
        &self.address
    }

    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// /32 for IPv4, /128 for IPv6.
    pub const fn is_host_route(&self) -> bool {
        self.prefix_len == self.address.max_prefix_len()
    }

    /// The enclosing network.
    pub fn network(&self) -> IpPrefix {
        IpPrefix {
            address: IpAddress(self.address.masked(self.prefix_len)),
            prefix_len: self.prefix_len,
        }
    }

    /// Same family, same length and same network bits.
    pub fn same_network(&self, other: &IpPrefix) -> bool {
        self.network() == other.network()
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for IpPrefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidIpPrefix(s.to_string());
        let (address, len) = s.rsplit_once('/').ok_or_else(invalid)?;
        let address = address.parse::<IpAddress>().map_err(|_| invalid())?;
        let prefix_len = len.parse::<u8>().map_err(|_| invalid())?;
        IpPrefix::new(address, prefix_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prefix(s: &str) -> IpPrefix {
        s.parse().unwrap()
    }

    #[test]
    fn test_link_local() {
        assert!("fe80::1".parse::<IpAddress>().unwrap().is_link_local());
        assert!("febf::1".parse::<IpAddress>().unwrap().is_link_local());
        assert!(!"2001:db8::1".parse::<IpAddress>().unwrap().is_link_local());
        assert!(!"169.254.0.1".parse::<IpAddress>().unwrap().is_link_local());
    }

    #[test]
    fn test_prefix_parse() {
        let v4 = prefix("10.0.0.1/24");
        assert!(!v4.address().is_ipv6());
        assert_eq!(v4.prefix_len(), 24);
        assert_eq!(v4.to_string(), "10.0.0.1/24");

        assert!(prefix("2001:db8::1/64").address().is_ipv6());

        for bad in ["10.0.0.0/33", "2001:db8::/129", "10.0.0.1", "10.0.0.1/x", "host/24"] {
            assert_eq!(
                bad.parse::<IpPrefix>().unwrap_err(),
                ParseError::InvalidIpPrefix(bad.to_string())
            );
        }
    }

    #[test]
    fn test_host_route() {
        assert!(prefix("10.0.0.1/32").is_host_route());
        assert!(prefix("2001:db8::1/128").is_host_route());
        assert!(!prefix("10.0.0.0/24").is_host_route());
    }

    #[test]
    fn test_network() {
        assert_eq!(prefix("10.1.2.3/24").network().to_string(), "10.1.2.0/24");
        assert_eq!(prefix("2001:db8::5/64").network().to_string(), "2001:db8::/64");
        assert_eq!(prefix("10.1.2.3/0").network().to_string(), "0.0.0.0/0");
    }

    #[test]
    fn test_same_network() {
        let a = prefix("10.0.0.1/31");
        assert!(a.same_network(&prefix("10.0.0.0/31")));
        assert!(!a.same_network(&prefix("10.0.0.2/31")));
        assert!(!a.same_network(&prefix("10.0.0.0/30")));
        assert!(!a.same_network(&prefix("2001:db8::1/31")));
    }
}
