//! Test fixtures for engine scenarios
//!
//! Builders default to a healthy, operationally up Ethernet port so that each
//! test only spells out what it is about.

use netlens_engine::{
    DevConfigRecord, DeviceRecord, EngineConfig, InterfaceRecord, InterfacesEngine, LldpRecord,
    MemoryAccessor, MlagRecord, Snapshot, VlanRecord,
};
use netlens_types::{AdminState, InterfaceType, OperState};

/// Timestamp given to every fixture record (2024-01-01T00:00:00Z, in ms)
pub const FIXTURE_TIMESTAMP: i64 = 1_704_067_200_000;

/// Default MTU of fixture ports
pub const FIXTURE_MTU: u32 = 9216;

/// Default speed of fixture ports, in Mbps
pub const FIXTURE_SPEED: u64 = 25_000;

/// Builder for an interfaces table row
#[derive(Debug, Clone)]
pub struct InterfaceBuilder {
    record: InterfaceRecord,
}

impl InterfaceBuilder {
    /// Create an admin and operationally up port of the given type
    pub fn new(
        namespace: impl Into<String>,
        hostname: impl Into<String>,
        ifname: impl Into<String>,
        if_type: InterfaceType,
    ) -> Self {
        Self {
            record: InterfaceRecord {
                namespace: namespace.into(),
                hostname: hostname.into(),
                ifname: ifname.into(),
                if_type,
                state: OperState::Up,
                admin_state: AdminState::Up,
                mtu: FIXTURE_MTU,
                speed: FIXTURE_SPEED,
                timestamp: FIXTURE_TIMESTAMP,
                ..Default::default()
            },
        }
    }

    pub fn mtu(mut self, mtu: u32) -> Self {
        self.record.mtu = mtu;
        self
    }

    pub fn speed(mut self, speed: u64) -> Self {
        self.record.speed = speed;
        self
    }

    pub fn state(mut self, state: OperState) -> Self {
        self.record.state = state;
        self
    }

    pub fn admin_state(mut self, admin_state: AdminState) -> Self {
        self.record.admin_state = admin_state;
        self
    }

    /// Mark the port operationally down with a collected reason
    pub fn down(mut self, reason: impl Into<String>) -> Self {
        self.record.state = OperState::Down;
        self.record.reason = reason.into();
        self
    }

    pub fn master(mut self, master: impl Into<String>) -> Self {
        self.record.master = master.into();
        self
    }

    pub fn vlan(mut self, vlan: u16) -> Self {
        self.record.vlan = vlan;
        self
    }

    /// Add an IPv4 address in CIDR notation
    pub fn ip(mut self, address: impl Into<String>) -> Self {
        self.record.ip_address_list.push(address.into());
        self
    }

    /// Add an IPv6 address in CIDR notation
    pub fn ip6(mut self, address: impl Into<String>) -> Self {
        self.record.ip6_address_list.push(address.into());
        self
    }

    pub fn num_changes(mut self, num_changes: u64) -> Self {
        self.record.num_changes = num_changes;
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.record.timestamp = timestamp;
        self
    }

    pub fn build(self) -> InterfaceRecord {
        self.record
    }
}

impl From<InterfaceBuilder> for InterfaceRecord {
    fn from(builder: InterfaceBuilder) -> Self {
        builder.build()
    }
}

/// Ethernet port
pub fn ethernet(namespace: &str, hostname: &str, ifname: &str) -> InterfaceBuilder {
    InterfaceBuilder::new(namespace, hostname, ifname, InterfaceType::Ethernet)
}

/// Routed sub-interface
pub fn subinterface(namespace: &str, hostname: &str, ifname: &str) -> InterfaceBuilder {
    InterfaceBuilder::new(namespace, hostname, ifname, InterfaceType::Subinterface)
}

/// Bond (port-channel)
pub fn bond(namespace: &str, hostname: &str, ifname: &str) -> InterfaceBuilder {
    InterfaceBuilder::new(namespace, hostname, ifname, InterfaceType::Bond)
}

/// Loopback, reporting the unknown operational state Linux uses
pub fn loopback(namespace: &str, hostname: &str, ifname: &str) -> InterfaceBuilder {
    InterfaceBuilder::new(namespace, hostname, ifname, InterfaceType::Loopback)
        .state(OperState::Unknown)
        .mtu(65536)
}

/// Builder for a complete snapshot within one namespace
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    namespace: String,
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            snapshot: Snapshot::default(),
        }
    }

    /// Add an interface row
    pub fn interface(mut self, record: impl Into<InterfaceRecord>) -> Self {
        self.snapshot.interfaces.push(record.into());
        self
    }

    /// Add several interface rows
    pub fn interfaces<I, R>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<InterfaceRecord>,
    {
        self.snapshot
            .interfaces
            .extend(records.into_iter().map(Into::into));
        self
    }

    /// Add a one-directional LLDP neighbor entry
    pub fn lldp(mut self, hostname: &str, ifname: &str, peer_hostname: &str, peer_ifname: &str) -> Self {
        self.snapshot.lldp.push(LldpRecord {
            namespace: self.namespace.clone(),
            hostname: hostname.to_string(),
            ifname: ifname.to_string(),
            peer_hostname: peer_hostname.to_string(),
            peer_ifname: peer_ifname.to_string(),
            timestamp: FIXTURE_TIMESTAMP,
        });
        self
    }

    /// Add LLDP neighbor entries for a cable, seen from both ends
    pub fn link(self, a_host: &str, a_ifname: &str, b_host: &str, b_ifname: &str) -> Self {
        self.lldp(a_host, a_ifname, b_host, b_ifname)
            .lldp(b_host, b_ifname, a_host, a_ifname)
    }

    /// Declare an MLAG peer link on a device
    pub fn mlag(mut self, hostname: &str, peer_link: &str) -> Self {
        self.snapshot.mlag.push(MlagRecord {
            namespace: self.namespace.clone(),
            hostname: hostname.to_string(),
            peer_link: peer_link.to_string(),
            timestamp: FIXTURE_TIMESTAMP,
        });
        self
    }

    /// Add a VLAN with its member interfaces
    pub fn vlan(mut self, hostname: &str, vlan: u16, members: &[&str]) -> Self {
        self.snapshot.vlan.push(VlanRecord {
            namespace: self.namespace.clone(),
            hostname: hostname.to_string(),
            vlan,
            vlan_name: format!("Vlan{}", vlan),
            interfaces: members.iter().map(|m| m.to_string()).collect(),
            timestamp: FIXTURE_TIMESTAMP,
        });
        self
    }

    /// Add a device row
    pub fn device(mut self, hostname: &str, os: &str) -> Self {
        self.snapshot.device.push(DeviceRecord {
            namespace: self.namespace.clone(),
            hostname: hostname.to_string(),
            os: os.to_string(),
            status: "alive".to_string(),
            timestamp: FIXTURE_TIMESTAMP,
            ..Default::default()
        });
        self
    }

    /// Add a device row and its running configuration
    pub fn config(mut self, hostname: &str, os: &str, text: &str) -> Self {
        self.snapshot.devconfig.push(DevConfigRecord {
            namespace: self.namespace.clone(),
            hostname: hostname.to_string(),
            config: text.to_string(),
            timestamp: FIXTURE_TIMESTAMP,
        });
        self.device(hostname, os)
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }

    pub fn accessor(self) -> MemoryAccessor {
        MemoryAccessor::new(self.build())
    }

    /// Engine over this snapshot with the default configuration
    pub fn engine(self) -> InterfacesEngine<MemoryAccessor> {
        self.engine_with(EngineConfig::default())
    }

    pub fn engine_with(self, config: EngineConfig) -> InterfacesEngine<MemoryAccessor> {
        InterfacesEngine::new(self.accessor(), config)
    }
}

/// Two leaves cabled to one spine with matching routed links
///
/// ```text
/// leaf01:swp1 ── spine01:swp1
/// leaf02:swp1 ── spine01:swp2
/// ```
pub fn two_leaf_fabric(namespace: &str) -> SnapshotBuilder {
    SnapshotBuilder::new(namespace)
        .interfaces([
            ethernet(namespace, "leaf01", "swp1").ip("10.0.0.1/31"),
            ethernet(namespace, "spine01", "swp1").ip("10.0.0.0/31"),
            ethernet(namespace, "leaf02", "swp1").ip("10.0.0.3/31"),
            ethernet(namespace, "spine01", "swp2").ip("10.0.0.2/31"),
        ])
        .link("leaf01", "swp1", "spine01", "swp1")
        .link("leaf02", "swp1", "spine01", "swp2")
}
