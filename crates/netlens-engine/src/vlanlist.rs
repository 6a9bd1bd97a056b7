//! Per-interface VLAN lists.
//!
//! The VLAN table is VLAN-oriented (one row per VLAN with its member
//! interfaces); this inverts it into the sorted list of VLANs each interface
//! carries.

use crate::accessor::{Scope, TableAccessor};
use crate::engine::InterfacesEngine;
use crate::error::NetlensResult;
use crate::records::{InterfaceKey, InterfaceRecord, VlanRecord};
use netlens_types::PortMode;
use std::collections::{BTreeSet, HashMap};
use tracing::instrument;

/// Inverts VLAN membership into interface → VLAN set.
pub fn invert_membership(vlans: &[VlanRecord]) -> HashMap<InterfaceKey, BTreeSet<u16>> {
    let mut members: HashMap<InterfaceKey, BTreeSet<u16>> = HashMap::new();
    for vlan in vlans {
        for ifname in &vlan.interfaces {
            members
                .entry((vlan.namespace.clone(), vlan.hostname.clone(), ifname.clone()))
                .or_default()
                .insert(vlan.vlan);
        }
    }
    members
}

impl<A: TableAccessor> InterfacesEngine<A> {
    /// Sets `vlanList` on every row.
    ///
    /// Access and routed ports get an empty list: their pvid already says
    /// everything. Trunk and unknown ports keep the full membership.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn derive_vlanlist(&self, rows: &mut [InterfaceRecord]) -> NetlensResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let vlans = self.accessor.vlans(&Scope::covering(rows))?;
        let members = invert_membership(&vlans);

        for row in rows.iter_mut() {
            row.vlan_list = match row.portmode {
                PortMode::Access | PortMode::Routed => Vec::new(),
                _ => members
                    .get(&row.key())
                    .map(|set| set.iter().copied().collect())
                    .unwrap_or_default(),
            };
        }

        Ok(())
    }
}
