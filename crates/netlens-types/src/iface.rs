//! Interface classifications as reported in the collected interface table.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of an interface.
///
/// Values outside the well-known set are preserved verbatim in
/// [`InterfaceType::Other`] so that filters on vendor-specific types keep
/// working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InterfaceType {
    /// Physical Ethernet port.
    Ethernet,
    /// Link aggregation (bond / port-channel / ae).
    Bond,
    /// Member port of a bond.
    BondSlave,
    /// Routed sub-interface (e.g. `Ethernet0.100`, `xe-0/0/0.0`).
    Subinterface,
    /// VLAN interface (SVI or VLAN sub-interface).
    Vlan,
    /// VXLAN tunnel endpoint interface.
    Vxlan,
    /// Loopback interface.
    Loopback,
    /// Software bridge.
    Bridge,
    /// VRF device.
    Vrf,
    /// Generic tunnel (GRE, IPinIP, ...).
    Tunnel,
    /// Platform-internal interface, hidden by default.
    Internal,
    /// Any other collector-reported type.
    Other(String),
}

impl InterfaceType {
    /// Returns true for the Ethernet family of types (`ethernet`,
    /// and vendor types spelled `ether*`).
    pub fn is_ethernet_family(&self) -> bool {
        self.as_str().starts_with("ether")
    }

    /// Returns true for sub-interface style types whose parent is the part of
    /// the name before the first `.`.
    pub fn is_subinterface_like(&self) -> bool {
        matches!(self, InterfaceType::Subinterface | InterfaceType::Vlan)
    }

    /// Returns the collector spelling of this type.
    pub fn as_str(&self) -> &str {
        match self {
            InterfaceType::Ethernet => "ethernet",
            InterfaceType::Bond => "bond",
            InterfaceType::BondSlave => "bond_slave",
            InterfaceType::Subinterface => "subinterface",
            InterfaceType::Vlan => "vlan",
            InterfaceType::Vxlan => "vxlan",
            InterfaceType::Loopback => "loopback",
            InterfaceType::Bridge => "bridge",
            InterfaceType::Vrf => "vrf",
            InterfaceType::Tunnel => "tunnel",
            InterfaceType::Internal => "internal",
            InterfaceType::Other(s) => s,
        }
    }
}

impl Default for InterfaceType {
    fn default() -> Self {
        InterfaceType::Ethernet
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for InterfaceType {
    fn from(s: &str) -> Self {
        match s {
            "ethernet" => InterfaceType::Ethernet,
            "bond" => InterfaceType::Bond,
            "bond_slave" => InterfaceType::BondSlave,
            "subinterface" => InterfaceType::Subinterface,
            "vlan" => InterfaceType::Vlan,
            "vxlan" => InterfaceType::Vxlan,
            "loopback" => InterfaceType::Loopback,
            "bridge" => InterfaceType::Bridge,
            "vrf" => InterfaceType::Vrf,
            "tunnel" => InterfaceType::Tunnel,
            "internal" => InterfaceType::Internal,
            other => InterfaceType::Other(other.to_string()),
        }
    }
}

impl From<String> for InterfaceType {
    fn from(s: String) -> Self {
        InterfaceType::from(s.as_str())
    }
}

impl From<InterfaceType> for String {
    fn from(t: InterfaceType) -> String {
        match t {
            InterfaceType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Administrative state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    /// Interface is administratively up.
    Up,
    /// Interface is administratively down.
    Down,
    /// State not reported.
    #[default]
    #[serde(other)]
    Unknown,
}

impl AdminState {
    /// Returns true if the interface is administratively up.
    pub const fn is_up(&self) -> bool {
        matches!(self, AdminState::Up)
    }

    /// Returns true if the interface is administratively down.
    pub const fn is_down(&self) -> bool {
        matches!(self, AdminState::Down)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            AdminState::Up => "up",
            AdminState::Down => "down",
            AdminState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AdminState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperState {
    /// Interface is operationally up.
    Up,
    /// Interface is operationally down.
    Down,
    /// No cable / transceiver present.
    NotConnected,
    /// Disabled by an error condition (e.g. BPDU guard).
    ErrDisabled,
    /// State unknown/not available (Linux loopbacks report this).
    #[default]
    #[serde(other)]
    Unknown,
}

impl OperState {
    /// Returns true if the interface is operationally up.
    pub const fn is_up(&self) -> bool {
        matches!(self, OperState::Up)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OperState::Up => "up",
            OperState::Down => "down",
            OperState::NotConnected => "notConnected",
            OperState::ErrDisabled => "errDisabled",
            OperState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(OperState::Up),
            "down" => Ok(OperState::Down),
            "notConnected" => Ok(OperState::NotConnected),
            "errDisabled" => Ok(OperState::ErrDisabled),
            "unknown" => Ok(OperState::Unknown),
            _ => Err(ParseError::InvalidState(s.to_string())),
        }
    }
}

/// Derived switchport mode of an interface.
///
/// [`PortMode::Unset`] renders as the empty string: it is used for
/// administratively down ports and for the software bridge pseudo-interface,
/// and for rows whose mode was never derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    Access,
    Trunk,
    Routed,
    Unknown,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl PortMode {
    /// Returns true for the layer-2 modes that carry a pvid.
    pub const fn is_switchport(&self) -> bool {
        matches!(self, PortMode::Access | PortMode::Trunk)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PortMode::Access => "access",
            PortMode::Trunk => "trunk",
            PortMode::Routed => "routed",
            PortMode::Unknown => "unknown",
            PortMode::Unset => "",
        }
    }
}

impl fmt::Display for PortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "access" => Ok(PortMode::Access),
            "trunk" => Ok(PortMode::Trunk),
            "routed" => Ok(PortMode::Routed),
            "unknown" => Ok(PortMode::Unknown),
            _ => Err(ParseError::InvalidPortMode(s.to_string())),
        }
    }
}
