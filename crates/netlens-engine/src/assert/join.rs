//! Working set construction for the peering assertion.
//!
//! Interfaces are normalized (sub-interface parents, unit-zero collapsing),
//! joined to their LLDP neighbor and then resolved against each other on the
//! discovered peer identity.

use super::PeerResolution;
use crate::records::{InterfaceRecord, LldpRecord};
use crate::subintf::{is_unit_zero, parent_ifname, split_subintf_name};
use netlens_types::InterfaceType;
use std::collections::{HashMap, HashSet};

/// One interface of the working set.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkRow {
    pub record: InterfaceRecord,
    /// Physical interface used for the LLDP lookup.
    pub pifname: String,
    pub peer_hostname: String,
    pub peer_ifname: String,
}

impl WorkRow {
    fn new(record: InterfaceRecord) -> Self {
        let pifname = parent_ifname(&record.ifname, &record.if_type).to_string();
        Self {
            record,
            pifname,
            peer_hostname: String::new(),
            peer_ifname: String::new(),
        }
    }

    fn is_subinterface(&self) -> bool {
        self.record.if_type.is_subinterface_like()
    }
}

/// Collapses unit-zero interfaces onto their physical port.
///
/// `xe-0/0/0.0` becomes an Ethernet row named `xe-0/0/0`, and a separately
/// reported `xe-0/0/0` on the same device is dropped. Rows are then unique by
/// identity, first occurrence kept.
pub fn normalize(records: Vec<InterfaceRecord>) -> Vec<WorkRow> {
    let collapsed: HashSet<(String, String, String)> = records
        .iter()
        .filter(|r| is_unit_zero(&r.ifname))
        .filter_map(|r| {
            split_subintf_name(&r.ifname)
                .map(|(parent, _)| (r.namespace.clone(), r.hostname.clone(), parent.to_string()))
        })
        .collect();

    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(records.len());
    for mut record in records {
        if is_unit_zero(&record.ifname) {
            if let Some((parent, _)) = split_subintf_name(&record.ifname) {
                record.ifname = parent.to_string();
                record.if_type = InterfaceType::Ethernet;
            }
        } else if collapsed.contains(&record.key()) {
            continue;
        }

        if seen.insert(record.key()) {
            rows.push(WorkRow::new(record));
        }
    }
    rows
}

/// Attaches the LLDP neighbor of each row's physical interface.
///
/// Returns false if there is no usable LLDP entry at all.
pub fn attach_lldp(rows: &mut [WorkRow], lldp: &[LldpRecord]) -> bool {
    let mut neighbors: HashMap<(&str, &str, &str), &LldpRecord> = HashMap::new();
    for entry in lldp.iter().filter(|e| e.has_peer()) {
        neighbors
            .entry((entry.namespace.as_str(), entry.hostname.as_str(), entry.ifname.as_str()))
            .or_insert(entry);
    }
    if neighbors.is_empty() {
        return false;
    }

    for row in rows.iter_mut() {
        let key = (
            row.record.namespace.as_str(),
            row.record.hostname.as_str(),
            row.pifname.as_str(),
        );
        if let Some(entry) = neighbors.get(&key) {
            row.peer_hostname = entry.peer_hostname.clone();
            row.peer_ifname = entry.peer_ifname.clone();
        }
    }
    true
}

/// Resolves each row's peer within the working set.
///
/// Physical rows are matched on (namespace, peer host, peer port).
/// Sub-interfaces are matched on the peer's physical port and must share the
/// pvid. A peer that is not found but lives on a device absent from
/// `known_hosts` is unpolled.
pub fn resolve_peers(
    rows: &[WorkRow],
    known_hosts: &HashSet<(String, String)>,
) -> Vec<PeerResolution> {
    let mut physical: HashMap<(&str, &str, &str), usize> = HashMap::new();
    let mut subifs: HashMap<(&str, &str, &str, u16), usize> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let r = &row.record;
        if row.is_subinterface() {
            subifs
                .entry((r.namespace.as_str(), r.hostname.as_str(), row.pifname.as_str(), r.vlan))
                .or_insert(idx);
        } else {
            physical
                .entry((r.namespace.as_str(), r.hostname.as_str(), r.ifname.as_str()))
                .or_insert(idx);
        }
    }

    rows.iter()
        .map(|row| {
            if row.peer_hostname.is_empty() {
                return PeerResolution::NoPeerFound;
            }
            let ns = row.record.namespace.as_str();
            let found = if row.is_subinterface() {
                subifs
                    .get(&(ns, row.peer_hostname.as_str(), row.peer_ifname.as_str(), row.record.vlan))
                    .copied()
            } else {
                physical
                    .get(&(ns, row.peer_hostname.as_str(), row.peer_ifname.as_str()))
                    .copied()
            };
            match found {
                Some(idx) => PeerResolution::Resolved(idx),
                None if !known_hosts.contains(&(ns.to_string(), row.peer_hostname.clone())) => {
                    PeerResolution::PeerUnpolled
                }
                None => PeerResolution::NoPeerFound,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn intf(host: &str, ifname: &str, if_type: InterfaceType) -> InterfaceRecord {
        InterfaceRecord {
            namespace: "dc1".to_string(),
            hostname: host.to_string(),
            ifname: ifname.to_string(),
            if_type,
            ..Default::default()
        }
    }

    fn lldp(host: &str, ifname: &str, peer: &str, peer_if: &str) -> LldpRecord {
        LldpRecord {
            namespace: "dc1".to_string(),
            hostname: host.to_string(),
            ifname: ifname.to_string(),
            peer_hostname: peer.to_string(),
            peer_ifname: peer_if.to_string(),
            timestamp: 1,
        }
    }

    fn hosts(names: &[&str]) -> HashSet<(String, String)> {
        names
            .iter()
            .map(|h| ("dc1".to_string(), h.to_string()))
            .collect()
    }

    #[test]
    fn test_unit_zero_collapses_onto_parent() {
        let rows = normalize(vec![
            intf("qfx01", "xe-0/0/0", InterfaceType::Ethernet),
            intf("qfx01", "xe-0/0/0.0", InterfaceType::Subinterface),
            intf("qfx01", "xe-0/0/1", InterfaceType::Ethernet),
            intf("qfx02", "xe-0/0/0", InterfaceType::Ethernet),
        ]);

        let names: Vec<(&str, &str, &InterfaceType)> = rows
            .iter()
            .map(|r| (r.record.hostname.as_str(), r.record.ifname.as_str(), &r.record.if_type))
            .collect();
        assert_eq!(
            names,
            vec![
                ("qfx01", "xe-0/0/0", &InterfaceType::Ethernet),
                ("qfx01", "xe-0/0/1", &InterfaceType::Ethernet),
                ("qfx02", "xe-0/0/0", &InterfaceType::Ethernet),
            ]
        );
        assert_eq!(rows[0].pifname, "xe-0/0/0");
    }

    #[test]
    fn test_subinterface_parent_name() {
        let rows = normalize(vec![intf("leaf01", "swp1.100", InterfaceType::Subinterface)]);
        assert_eq!(rows[0].pifname, "swp1");
        assert_eq!(rows[0].record.ifname, "swp1.100");
    }

    #[test]
    fn test_attach_lldp_ignores_dash_ports() {
        let mut rows = normalize(vec![intf("leaf01", "swp1", InterfaceType::Ethernet)]);
        assert!(!attach_lldp(&mut rows, &[lldp("leaf01", "swp1", "spine01", "-")]));
        assert!(attach_lldp(&mut rows, &[lldp("leaf01", "swp1", "spine01", "swp3")]));
        assert_eq!(rows[0].peer_hostname, "spine01");
        assert_eq!(rows[0].peer_ifname, "swp3");
    }

    #[test]
    fn test_resolve_physical_peers() {
        let mut rows = normalize(vec![
            intf("leaf01", "swp1", InterfaceType::Ethernet),
            intf("spine01", "swp3", InterfaceType::Ethernet),
            intf("leaf01", "swp2", InterfaceType::Ethernet),
            intf("leaf01", "swp4", InterfaceType::Ethernet),
            intf("leaf01", "swp5", InterfaceType::Ethernet),
        ]);
        attach_lldp(
            &mut rows,
            &[
                lldp("leaf01", "swp1", "spine01", "swp3"),
                lldp("spine01", "swp3", "leaf01", "swp1"),
                lldp("leaf01", "swp4", "spine01", "swp9"),
                lldp("leaf01", "swp5", "server01", "eth0"),
            ],
        );

        let resolved = resolve_peers(&rows, &hosts(&["leaf01", "spine01"]));
        assert_eq!(
            resolved,
            vec![
                PeerResolution::Resolved(1),
                PeerResolution::Resolved(0),
                PeerResolution::NoPeerFound,
                PeerResolution::NoPeerFound,
                PeerResolution::PeerUnpolled,
            ]
        );
    }

    #[test]
    fn test_resolve_subinterfaces_by_pvid() {
        let mut a10 = intf("leaf01", "swp1.10", InterfaceType::Subinterface);
        a10.vlan = 10;
        let mut b10 = intf("leaf02", "swp2.10", InterfaceType::Subinterface);
        b10.vlan = 10;
        let mut b20 = intf("leaf02", "swp2.20", InterfaceType::Subinterface);
        b20.vlan = 20;

        let mut rows = normalize(vec![a10, b20, b10]);
        attach_lldp(&mut rows, &[lldp("leaf01", "swp1", "leaf02", "swp2")]);

        let resolved = resolve_peers(&rows, &hosts(&["leaf01", "leaf02"]));
        assert_eq!(resolved[0], PeerResolution::Resolved(2));
    }
}
