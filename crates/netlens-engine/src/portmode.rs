//! Portmode derivation.
//!
//! Each interface is classified as access, trunk, routed or unknown. Device
//! configuration is the primary source; interfaces it does not describe fall
//! back to an address-presence heuristic.

use crate::accessor::{Scope, TableAccessor};
use crate::config::PortmodeConfig;
use crate::engine::InterfacesEngine;
use crate::error::NetlensResult;
use crate::records::InterfaceRecord;
use netlens_confparse::{
    extract_access_ports, extract_trunk_ports, parse_config, ConfParseResult, Grammar,
};
use netlens_types::{InterfaceType, PortMode};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, instrument, warn};

/// Access and trunk ports found in one device configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Switchports {
    /// Access port name to access VLAN.
    pub access: BTreeMap<String, u16>,
    /// Trunk port name to allowed VLANs.
    pub trunk: BTreeMap<String, BTreeSet<u16>>,
}

/// Turns raw device configuration into switchport roles.
pub trait ConfigInterpreter {
    /// Parses `config` under `grammar` and extracts its switchports.
    ///
    /// `os` is the device OS name, or the grammar name when the OS is not
    /// known.
    fn switchports(&self, config: &str, grammar: Grammar, os: &str) -> ConfParseResult<Switchports>;
}

/// Interpreter backed by the built-in grammars.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinInterpreter;

impl ConfigInterpreter for BuiltinInterpreter {
    fn switchports(&self, config: &str, grammar: Grammar, os: &str) -> ConfParseResult<Switchports> {
        let tree = parse_config(config, grammar)?;
        Ok(Switchports {
            access: extract_access_ports(&tree, os),
            trunk: extract_trunk_ports(&tree, os),
        })
    }
}

/// Picks the configuration grammar for a device.
///
/// A known OS decides by family name. Otherwise the text is sniffed for
/// brace-grammar markers.
pub fn select_grammar(config: &PortmodeConfig, os: Option<&str>, text: &str) -> Grammar {
    let junos_like = match os {
        Some(os) => {
            let os = os.to_lowercase();
            config
                .junos_os_families
                .iter()
                .any(|family| os.contains(family.as_str()))
        }
        None => config.junos_markers.iter().any(|m| text.contains(m.as_str())),
    };
    if junos_like {
        Grammar::Junos
    } else {
        Grammar::Ios
    }
}

/// Portmode of an interface the configuration says nothing about.
pub fn fallback_portmode(row: &InterfaceRecord) -> PortMode {
    if !row.ip6_address_list.is_empty() || !row.ip_address_list.is_empty() {
        PortMode::Routed
    } else {
        PortMode::Unknown
    }
}

#[derive(Debug, Clone, Copy)]
enum PortRole {
    Access(u16),
    Trunk,
}

impl<A: TableAccessor> InterfacesEngine<A> {
    /// Sets `portmode` on every row, and `vlan` on access ports.
    ///
    /// Devices whose configuration fails to parse keep the fallback
    /// classification.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn derive_portmode(&self, rows: &mut [InterfaceRecord]) -> NetlensResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let scope = Scope::covering(rows);
        let configs = self.accessor.devconfig(&scope)?;
        let devices = self.accessor.devices(&scope)?;
        let os_by_host: HashMap<(&str, &str), &str> = devices
            .iter()
            .map(|d| ((d.namespace.as_str(), d.hostname.as_str()), d.os.as_str()))
            .collect();

        let mut roles: HashMap<(String, String, String), PortRole> = HashMap::new();
        for conf in &configs {
            let os = os_by_host
                .get(&(conf.namespace.as_str(), conf.hostname.as_str()))
                .copied()
                .filter(|os| !os.is_empty());
            let grammar = select_grammar(&self.config.portmode, os, &conf.config);
            let os_hint = os.map_or_else(|| grammar.to_string(), str::to_string);

            let ports = match self.interpreter.switchports(&conf.config, grammar, &os_hint) {
                Ok(ports) => ports,
                Err(e) => {
                    warn!(
                        namespace = %conf.namespace,
                        hostname = %conf.hostname,
                        %grammar,
                        error = %e,
                        "skipping portmode derivation for device"
                    );
                    continue;
                }
            };

            debug!(
                namespace = %conf.namespace,
                hostname = %conf.hostname,
                access = ports.access.len(),
                trunk = ports.trunk.len(),
                "derived switchports"
            );
            let key = |ifname: &str| (conf.namespace.clone(), conf.hostname.clone(), ifname.to_string());
            for (ifname, vlan) in &ports.access {
                roles.insert(key(ifname), PortRole::Access(*vlan));
            }
            for ifname in ports.trunk.keys() {
                roles.insert(key(ifname), PortRole::Trunk);
            }
        }

        let bridge = self.config.portmode.bridge_ifname.as_str();
        for row in rows.iter_mut() {
            row.portmode = match roles.get(&row.key()) {
                Some(PortRole::Access(vlan)) => {
                    row.vlan = *vlan;
                    PortMode::Access
                }
                Some(PortRole::Trunk) => PortMode::Trunk,
                None => fallback_portmode(row),
            };

            if row.ifname == bridge || row.admin_state.is_down() {
                row.portmode = PortMode::Unset;
            }
            if row.if_type == InterfaceType::Vxlan && row.portmode == PortMode::Routed {
                row.portmode = PortMode::Trunk;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{MemoryAccessor, Snapshot};
    use crate::config::EngineConfig;
    use crate::records::{DevConfigRecord, DeviceRecord};
    use netlens_confparse::ConfParseError;
    use netlens_types::AdminState;
    use pretty_assertions::assert_eq;

    fn intf(host: &str, ifname: &str) -> InterfaceRecord {
        InterfaceRecord {
            namespace: "dc1".to_string(),
            hostname: host.to_string(),
            ifname: ifname.to_string(),
            admin_state: AdminState::Up,
            ..Default::default()
        }
    }

    fn engine(snapshot: Snapshot) -> InterfacesEngine<MemoryAccessor> {
        InterfacesEngine::new(MemoryAccessor::new(snapshot), EngineConfig::default())
    }

    #[test]
    fn test_select_grammar() {
        let config = PortmodeConfig::default();
        assert_eq!(select_grammar(&config, Some("junos-qfx"), ""), Grammar::Junos);
        assert_eq!(select_grammar(&config, Some("PanOS"), ""), Grammar::Junos);
        assert_eq!(select_grammar(&config, Some("cumulus"), "\ninterfaces {\n"), Grammar::Ios);
        assert_eq!(
            select_grammar(&config, None, "version 1;\ninterfaces {\n    xe-0/0/0;\n}\n"),
            Grammar::Junos
        );
        assert_eq!(select_grammar(&config, None, "interface swp1\n"), Grammar::Ios);
    }

    #[test]
    fn test_fallback_portmode() {
        let mut row = intf("leaf01", "swp1");
        assert_eq!(fallback_portmode(&row), PortMode::Unknown);
        row.ip_address_list = vec!["10.0.0.1/31".to_string()];
        assert_eq!(fallback_portmode(&row), PortMode::Routed);
        row.ip_address_list.clear();
        row.ip6_address_list = vec!["2001:db8::1/64".to_string()];
        assert_eq!(fallback_portmode(&row), PortMode::Routed);
    }

    #[test]
    fn test_config_derived_portmode() {
        let snapshot = Snapshot {
            devconfig: vec![DevConfigRecord {
                namespace: "dc1".to_string(),
                hostname: "leaf01".to_string(),
                config: "interface Ethernet1\n switchport mode access\n switchport access vlan 10\n\
                         interface Ethernet2\n switchport mode trunk\n"
                    .to_string(),
                timestamp: 1,
            }],
            device: vec![DeviceRecord {
                namespace: "dc1".to_string(),
                hostname: "leaf01".to_string(),
                os: "eos".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let engine = engine(snapshot);

        let mut rows = vec![
            intf("leaf01", "Ethernet1"),
            intf("leaf01", "Ethernet2"),
            intf("leaf01", "Ethernet3"),
        ];
        rows[1].vlan = 1;
        engine.derive_portmode(&mut rows).unwrap();

        assert_eq!(rows[0].portmode, PortMode::Access);
        assert_eq!(rows[0].vlan, 10);
        assert_eq!(rows[1].portmode, PortMode::Trunk);
        assert_eq!(rows[1].vlan, 1);
        assert_eq!(rows[2].portmode, PortMode::Unknown);
    }

    #[test]
    fn test_overrides() {
        let engine = engine(Snapshot::default());

        let mut rows = vec![
            intf("leaf01", "bridge"),
            intf("leaf01", "swp1"),
            intf("leaf01", "vni10"),
            intf("leaf01", "vni20"),
        ];
        rows[1].admin_state = AdminState::Down;
        rows[1].ip_address_list = vec!["10.0.0.1/31".to_string()];
        rows[2].if_type = InterfaceType::Vxlan;
        rows[2].ip_address_list = vec!["10.0.0.9/32".to_string()];
        rows[3].if_type = InterfaceType::Vxlan;

        engine.derive_portmode(&mut rows).unwrap();

        assert_eq!(rows[0].portmode, PortMode::Unset);
        assert_eq!(rows[1].portmode, PortMode::Unset);
        assert_eq!(rows[2].portmode, PortMode::Trunk);
        assert_eq!(rows[3].portmode, PortMode::Unknown);
    }

    struct Broken;

    impl ConfigInterpreter for Broken {
        fn switchports(&self, _: &str, _: Grammar, _: &str) -> ConfParseResult<Switchports> {
            Err(ConfParseError::Unclosed { open: 1 })
        }
    }

    #[test]
    fn test_parse_failure_skips_device() {
        let snapshot = Snapshot {
            devconfig: vec![DevConfigRecord {
                namespace: "dc1".to_string(),
                hostname: "leaf01".to_string(),
                config: "garbage".to_string(),
                timestamp: 1,
            }],
            ..Default::default()
        };
        let engine = engine(snapshot).with_interpreter(Broken);

        let mut rows = vec![intf("leaf01", "swp1")];
        rows[0].ip_address_list = vec!["10.0.0.1/31".to_string()];
        engine.derive_portmode(&mut rows).unwrap();
        assert_eq!(rows[0].portmode, PortMode::Routed);
    }
}
