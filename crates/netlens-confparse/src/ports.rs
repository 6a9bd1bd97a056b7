//! Access and trunk switchport extraction from a parsed configuration.
//!
//! Three configuration dialects are understood:
//!
//! - `interface X` blocks with `switchport ...` statements (IOS, NX-OS, EOS)
//! - ifupdown2 `iface X` blocks with `bridge-access` / `bridge-vids`
//!   (Cumulus)
//! - the JunOS `interfaces` hierarchy with `family ethernet-switching`
//!   units, emitted as `<ifname>.<unit>`

use crate::tree::{ConfigNode, ConfigTree};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const MAX_VLAN: u16 = 4094;

/// Returns true for OS families whose configuration uses the JunOS hierarchy.
fn is_junos_like(os: &str) -> bool {
    let os = os.to_lowercase();
    os.contains("junos") || os.contains("panos")
}

/// Returns the access ports of a device and their access VLAN.
pub fn extract_access_ports(tree: &ConfigTree, os: &str) -> BTreeMap<String, u16> {
    let ports = if is_junos_like(os) {
        junos_switchports(tree)
            .into_iter()
            .filter(|p| p.mode == Mode::Access)
            .filter_map(|p| p.vlans.first().copied().map(|vlan| (p.ifname, vlan)))
            .collect()
    } else {
        let mut ports = BTreeMap::new();
        for (node, ifname) in tree.roots_with_prefix("interface") {
            if let Some(vlan) = ios_access_vlan(node) {
                ports.insert(ifname.to_string(), vlan);
            }
        }
        for (node, ifname) in tree.roots_with_prefix("iface") {
            if let Some(vlan) = node.value_of("bridge-access").and_then(parse_vlan) {
                ports.insert(ifname.to_string(), vlan);
            }
        }
        ports
    };

    debug!(os, count = ports.len(), "extracted access ports");
    ports
}

/// Returns the trunk ports of a device and their allowed VLAN set.
///
/// An empty set means the configuration does not restrict the allowed VLANs.
pub fn extract_trunk_ports(tree: &ConfigTree, os: &str) -> BTreeMap<String, BTreeSet<u16>> {
    let ports = if is_junos_like(os) {
        junos_switchports(tree)
            .into_iter()
            .filter(|p| p.mode == Mode::Trunk)
            .map(|p| (p.ifname, p.vlans.into_iter().collect()))
            .collect()
    } else {
        let mut ports = BTreeMap::new();
        for (node, ifname) in tree.roots_with_prefix("interface") {
            if node.value_of("switchport mode") == Some("trunk") {
                ports.insert(ifname.to_string(), ios_trunk_vlans(node));
            }
        }
        for (node, ifname) in tree.roots_with_prefix("iface") {
            // bridge-access wins over bridge-vids on the same port
            if node.value_of("bridge-access").is_some() {
                continue;
            }
            if let Some(vids) = node.value_of("bridge-vids") {
                ports.insert(ifname.to_string(), parse_vlan_ranges(vids));
            }
        }
        ports
    };

    debug!(os, count = ports.len(), "extracted trunk ports");
    ports
}

/// Parses a VLAN list such as `10,20-22 30` or `[ 10 20-22 ]` into a set.
///
/// Tokens that are not VLAN ids or ranges of VLAN ids are ignored.
pub fn parse_vlan_ranges(text: &str) -> BTreeSet<u16> {
    let mut vlans = BTreeSet::new();
    let tokens = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|t| t.trim_matches(|c| c == '[' || c == ']'))
        .filter(|t| !t.is_empty());

    for token in tokens {
        match token.split_once('-') {
            Some((lo, hi)) => {
                if let (Some(lo), Some(hi)) = (parse_vlan(lo), parse_vlan(hi)) {
                    vlans.extend(lo..=hi);
                }
            }
            None => {
                if let Some(vlan) = parse_vlan(token) {
                    vlans.insert(vlan);
                }
            }
        }
    }
    vlans
}

fn parse_vlan(text: &str) -> Option<u16> {
    text.trim()
        .parse::<u16>()
        .ok()
        .filter(|v| (1..=MAX_VLAN).contains(v))
}

fn ios_access_vlan(node: &ConfigNode) -> Option<u16> {
    let vlan = node.value_of("switchport access vlan");
    match node.value_of("switchport mode") {
        Some("access") => Some(vlan.and_then(parse_vlan).unwrap_or(1)),
        None => vlan.and_then(parse_vlan),
        Some(_) => None,
    }
}

fn ios_trunk_vlans(node: &ConfigNode) -> BTreeSet<u16> {
    let mut vlans = BTreeSet::new();
    for (_, rest) in node.children_with_prefix("switchport trunk allowed vlan") {
        let (verb, list) = rest.split_once(' ').unwrap_or((rest, ""));
        match verb {
            "add" => vlans.extend(parse_vlan_ranges(list)),
            "remove" => {
                for vlan in parse_vlan_ranges(list) {
                    vlans.remove(&vlan);
                }
            }
            "none" => vlans.clear(),
            // unrestricted
            "all" | "except" => {}
            _ => vlans = parse_vlan_ranges(rest),
        }
    }
    vlans
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Access,
    Trunk,
}

#[derive(Debug)]
struct JunosSwitchport {
    ifname: String,
    mode: Mode,
    vlans: Vec<u16>,
}

/// VLAN name to id map from the top-level `vlans` stanza.
fn junos_vlan_names(tree: &ConfigTree) -> BTreeMap<&str, u16> {
    tree.root("vlans")
        .map(|vlans| {
            vlans
                .children
                .iter()
                .filter_map(|v| {
                    v.value_of("vlan-id")
                        .and_then(parse_vlan)
                        .map(|id| (v.text.as_str(), id))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn junos_switchports(tree: &ConfigTree) -> Vec<JunosSwitchport> {
    let Some(interfaces) = tree.root("interfaces") else {
        return Vec::new();
    };
    let names = junos_vlan_names(tree);
    let mut ports = Vec::new();

    for intf in &interfaces.children {
        for (unit, unit_id) in intf.children_with_prefix("unit") {
            let Some(family) = unit.child("family ethernet-switching") else {
                continue;
            };
            let mode = match family
                .value_of("interface-mode")
                .or_else(|| family.value_of("port-mode"))
            {
                Some("trunk") => Mode::Trunk,
                _ => Mode::Access,
            };

            let mut vlans = BTreeSet::new();
            let members = family
                .child("vlan")
                .and_then(|v| v.value_of("members"))
                .or_else(|| family.value_of("vlan members"));
            if let Some(members) = members {
                for member in members
                    .split_whitespace()
                    .map(|m| m.trim_matches(|c| c == '[' || c == ']'))
                    .filter(|m| !m.is_empty())
                {
                    match names.get(member) {
                        Some(id) => {
                            vlans.insert(*id);
                        }
                        None => vlans.extend(parse_vlan_ranges(member)),
                    }
                }
            }

            ports.push(JunosSwitchport {
                ifname: format!("{}.{}", intf.text, unit_id),
                mode,
                vlans: vlans.into_iter().collect(),
            });
        }
    }
    ports
}
