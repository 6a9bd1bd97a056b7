//! Typed records of the collected state tables.
//!
//! Field names serialize in camelCase to match the collected table columns.
//! Timestamps are milliseconds since the Unix epoch.

use crate::table::{Record, Value};
use netlens_types::{AdminState, InterfaceType, OperState, PortMode};
use serde::{Deserialize, Serialize};

/// Identity of an interface within one snapshot.
pub type InterfaceKey = (String, String, String);

/// One row of the interfaces table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterfaceRecord {
    pub namespace: String,
    pub hostname: String,
    pub ifname: String,
    #[serde(rename = "type")]
    pub if_type: InterfaceType,
    pub state: OperState,
    pub admin_state: AdminState,
    pub mtu: u32,
    /// Speed in Mbps.
    pub speed: u64,
    /// Enslaving device: bridge, bond or VRF.
    pub master: String,
    pub portmode: PortMode,
    /// Port (access) VLAN, 0 when none.
    pub vlan: u16,
    pub vlan_list: Vec<u16>,
    /// IPv4 addresses in CIDR notation.
    pub ip_address_list: Vec<String>,
    /// IPv6 addresses in CIDR notation.
    pub ip6_address_list: Vec<String>,
    pub description: String,
    /// Collected reason text for an operationally down interface.
    pub reason: String,
    pub num_changes: u64,
    pub macaddr: String,
    pub timestamp: i64,
    pub sqvers: String,
}

impl InterfaceRecord {
    pub fn key(&self) -> InterfaceKey {
        (
            self.namespace.clone(),
            self.hostname.clone(),
            self.ifname.clone(),
        )
    }

    pub fn host_key(&self) -> (String, String) {
        (self.namespace.clone(), self.hostname.clone())
    }
}

impl Record for InterfaceRecord {
    fn field(&self, name: &str) -> Option<Value> {
        let value: Value = match name {
            "namespace" => self.namespace.as_str().into(),
            "hostname" => self.hostname.as_str().into(),
            "ifname" => self.ifname.as_str().into(),
            "type" => self.if_type.as_str().into(),
            "state" => self.state.as_str().into(),
            "adminState" => self.admin_state.as_str().into(),
            "mtu" => self.mtu.into(),
            "speed" => self.speed.into(),
            "master" => self.master.as_str().into(),
            "portmode" => self.portmode.as_str().into(),
            "vlan" => self.vlan.into(),
            "vlanList" => self.vlan_list.clone().into(),
            "ipAddressList" => self.ip_address_list.clone().into(),
            "ip6AddressList" => self.ip6_address_list.clone().into(),
            "description" => self.description.as_str().into(),
            "reason" => self.reason.as_str().into(),
            "numChanges" => self.num_changes.into(),
            "macaddr" => self.macaddr.as_str().into(),
            "timestamp" => self.timestamp.into(),
            "sqvers" => self.sqvers.as_str().into(),
            _ => return None,
        };
        Some(value)
    }
}

/// One row of the LLDP neighbor table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LldpRecord {
    pub namespace: String,
    pub hostname: String,
    pub ifname: String,
    pub peer_hostname: String,
    /// `-` when the neighbor did not advertise a port.
    pub peer_ifname: String,
    pub timestamp: i64,
}

impl LldpRecord {
    /// Returns true if this entry names a usable peer port.
    pub fn has_peer(&self) -> bool {
        self.peer_ifname != "-"
    }
}

impl Record for LldpRecord {
    fn field(&self, name: &str) -> Option<Value> {
        let value: Value = match name {
            "namespace" => self.namespace.as_str().into(),
            "hostname" => self.hostname.as_str().into(),
            "ifname" => self.ifname.as_str().into(),
            "peerHostname" => self.peer_hostname.as_str().into(),
            "peerIfname" => self.peer_ifname.as_str().into(),
            "timestamp" => self.timestamp.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// One row of the MLAG table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MlagRecord {
    pub namespace: String,
    pub hostname: String,
    /// Interface carrying the MLAG peer link.
    pub peer_link: String,
    pub timestamp: i64,
}

/// One row of the VLAN table: a VLAN and its member interfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VlanRecord {
    pub namespace: String,
    pub hostname: String,
    pub vlan: u16,
    pub vlan_name: String,
    pub interfaces: Vec<String>,
    pub timestamp: i64,
}

/// Raw running configuration of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevConfigRecord {
    pub namespace: String,
    pub hostname: String,
    pub config: String,
    pub timestamp: i64,
}

/// One row of the device table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceRecord {
    pub namespace: String,
    pub hostname: String,
    pub os: String,
    pub vendor: String,
    pub status: String,
    pub timestamp: i64,
}
