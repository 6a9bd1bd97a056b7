//! Common types for network state analysis.
//!
//! This crate provides type-safe representations of the network primitives
//! that appear in collected device state tables:
//!
//! - [`IpAddress`]: IPv4 and IPv6 addresses
//! - [`IpPrefix`]: interface addresses in CIDR notation
//! - [`VlanId`]: IEEE 802.1Q VLAN identifiers
//! - [`InterfaceType`]: interface classifications as reported by collectors
//! - [`AdminState`], [`OperState`]: interface administrative/operational state
//! - [`PortMode`]: derived switchport mode

mod iface;
mod ip;
mod vlan;

pub use iface::{AdminState, InterfaceType, OperState, PortMode};
pub use ip::{IpAddress, IpPrefix};
pub use vlan::VlanId;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid IP prefix format: {0}")]
    InvalidIpPrefix(String),

    #[error("invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(String),

    #[error("invalid port mode: {0}")]
    InvalidPortMode(String),

    #[error("invalid interface state: {0}")]
    InvalidState(String),
}
