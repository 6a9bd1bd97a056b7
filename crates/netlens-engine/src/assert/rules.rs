//! Peer-consistency rules.
//!
//! Each rule looks at one local interface and its resolved peer and yields at
//! most one reason. Rules run in [`RULES`] order, which fixes the order of the
//! reason list.

use super::{AssertReason, PeerResolution};
use crate::records::InterfaceRecord;
use netlens_types::{AdminState, InterfaceType, IpPrefix, OperState};
use std::collections::BTreeSet;

/// Everything a rule may look at for one local interface.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub local: &'a InterfaceRecord,
    /// The peer record, present only when `resolution` is resolved.
    pub peer: Option<&'a InterfaceRecord>,
    pub resolution: PeerResolution,
    /// Bridge members, bond members and VLAN interfaces are checked through
    /// their parent.
    pub skip: bool,
    /// The interface's master is an MLAG peer link.
    pub mlag_peer_link: bool,
}

impl<'a> RuleInput<'a> {
    /// The peer for rules that also honor the skip flag.
    fn checked_peer(&self) -> Option<&'a InterfaceRecord> {
        if self.skip {
            None
        } else {
            self.peer
        }
    }
}

pub type Rule = fn(&RuleInput<'_>) -> Option<AssertReason>;

pub const RULES: &[Rule] = &[
    oper_state,
    no_peer,
    unpolled_peer,
    mtu,
    speed,
    if_type,
    portmode,
    ip_subnet,
    pvid,
    vlan_set,
];

/// Runs every rule in order and collects the reasons.
pub fn evaluate(input: &RuleInput<'_>) -> Vec<AssertReason> {
    RULES.iter().filter_map(|rule| rule(input)).collect()
}

fn oper_state(input: &RuleInput<'_>) -> Option<AssertReason> {
    let local = input.local;
    let healthy = local.admin_state == AdminState::Down
        || (local.admin_state == AdminState::Up && local.state == OperState::Up);
    if healthy {
        return None;
    }
    Some(AssertReason::interface_down(&local.reason))
}

fn no_peer(input: &RuleInput<'_>) -> Option<AssertReason> {
    (input.resolution == PeerResolution::NoPeerFound && !input.skip)
        .then_some(AssertReason::NoPeerFound)
}

fn unpolled_peer(input: &RuleInput<'_>) -> Option<AssertReason> {
    (input.resolution == PeerResolution::PeerUnpolled && !input.skip)
        .then_some(AssertReason::UnpolledPeer)
}

fn mtu(input: &RuleInput<'_>) -> Option<AssertReason> {
    let peer = input.checked_peer()?;
    (input.local.mtu != peer.mtu).then_some(AssertReason::MtuMismatch)
}

fn speed(input: &RuleInput<'_>) -> Option<AssertReason> {
    let peer = input.checked_peer()?;
    (input.local.speed != peer.speed).then_some(AssertReason::SpeedMismatch)
}

/// VLAN interfaces may face a peer's routed sub-interface, and Ethernet
/// flavors are interchangeable.
pub fn types_compatible(local: &InterfaceType, peer: &InterfaceType) -> bool {
    local == peer
        || (*local == InterfaceType::Vlan && *peer == InterfaceType::Subinterface)
        || (local.is_ethernet_family() && peer.is_ethernet_family())
}

fn if_type(input: &RuleInput<'_>) -> Option<AssertReason> {
    let peer = input.peer?;
    (!types_compatible(&input.local.if_type, &peer.if_type)).then_some(AssertReason::TypeMismatch)
}

fn portmode(input: &RuleInput<'_>) -> Option<AssertReason> {
    let peer = input.peer?;
    (input.local.portmode != peer.portmode).then_some(AssertReason::PortModeMismatch)
}

/// Compares the first addresses of two address lists.
///
/// Empty lists match. Lists of different lengths never do. Otherwise a host
/// route on the local side, or both firsts in the same network, match.
/// Addresses that do not parse only match themselves.
pub fn addresses_compatible(local: &[String], peer: &[String]) -> bool {
    if local.len() != peer.len() {
        return false;
    }
    let (Some(first), Some(peer_first)) = (local.first(), peer.first()) else {
        return true;
    };
    match (first.parse::<IpPrefix>(), peer_first.parse::<IpPrefix>()) {
        (Ok(prefix), _) if prefix.is_host_route() => true,
        (Ok(prefix), Ok(peer_prefix)) => prefix.same_network(&peer_prefix),
        _ => first == peer_first,
    }
}

fn ip_subnet(input: &RuleInput<'_>) -> Option<AssertReason> {
    let peer = input.checked_peer()?;
    (!addresses_compatible(&input.local.ip_address_list, &peer.ip_address_list))
        .then_some(AssertReason::IpAddressMismatch)
}

fn pvid(input: &RuleInput<'_>) -> Option<AssertReason> {
    if !input.local.portmode.is_switchport() {
        return None;
    }
    let peer = input.peer?;
    (input.local.vlan != peer.vlan).then_some(AssertReason::PvidMismatch)
}

fn vlan_set(input: &RuleInput<'_>) -> Option<AssertReason> {
    if input.mlag_peer_link {
        return None;
    }
    let peer = input.peer?;
    let local: BTreeSet<u16> = input.local.vlan_list.iter().copied().collect();
    let remote: BTreeSet<u16> = peer.vlan_list.iter().copied().collect();
    (local != remote).then_some(AssertReason::VlanSetMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netlens_types::PortMode;
    use pretty_assertions::assert_eq;

    fn port(ifname: &str) -> InterfaceRecord {
        InterfaceRecord {
            namespace: "dc1".to_string(),
            hostname: "leaf01".to_string(),
            ifname: ifname.to_string(),
            if_type: InterfaceType::Ethernet,
            state: OperState::Up,
            admin_state: AdminState::Up,
            mtu: 9216,
            speed: 25000,
            portmode: PortMode::Routed,
            ..Default::default()
        }
    }

    fn peered<'a>(local: &'a InterfaceRecord, peer: &'a InterfaceRecord) -> RuleInput<'a> {
        RuleInput {
            local,
            peer: Some(peer),
            resolution: PeerResolution::Resolved(1),
            skip: false,
            mlag_peer_link: false,
        }
    }

    fn unpeered(local: &InterfaceRecord, resolution: PeerResolution) -> RuleInput<'_> {
        RuleInput {
            local,
            peer: None,
            resolution,
            skip: false,
            mlag_peer_link: false,
        }
    }

    #[test]
    fn test_matching_pair_has_no_reasons() {
        let a = port("swp1");
        let b = port("swp2");
        assert!(evaluate(&peered(&a, &b)).is_empty());
    }

    #[test]
    fn test_reason_order_is_fixed() {
        let mut a = port("swp1");
        a.state = OperState::Down;
        let mut b = port("swp2");
        b.mtu = 1500;
        b.speed = 10000;
        b.if_type = InterfaceType::Bond;
        b.portmode = PortMode::Trunk;

        assert_eq!(
            evaluate(&peered(&a, &b)),
            vec![
                AssertReason::interface_down(""),
                AssertReason::MtuMismatch,
                AssertReason::SpeedMismatch,
                AssertReason::TypeMismatch,
                AssertReason::PortModeMismatch,
            ]
        );
    }

    #[test]
    fn test_oper_state() {
        let mut a = port("swp1");
        a.state = OperState::Down;
        a.reason = "link flap".to_string();
        let input = unpeered(&a, PeerResolution::NoPeerFound);
        assert_eq!(oper_state(&input), Some(AssertReason::interface_down("link flap")));

        a.admin_state = AdminState::Down;
        let input = unpeered(&a, PeerResolution::NoPeerFound);
        assert_eq!(oper_state(&input), None);

        a.admin_state = AdminState::Unknown;
        a.state = OperState::Up;
        a.reason.clear();
        let input = unpeered(&a, PeerResolution::NoPeerFound);
        assert_eq!(oper_state(&input).map(|r| r.to_string()), Some("Interface Down".to_string()));
    }

    #[test]
    fn test_missing_peer_rules_respect_skip() {
        let a = port("swp1");
        assert_eq!(
            evaluate(&unpeered(&a, PeerResolution::NoPeerFound)),
            vec![AssertReason::NoPeerFound]
        );
        assert_eq!(
            evaluate(&unpeered(&a, PeerResolution::PeerUnpolled)),
            vec![AssertReason::UnpolledPeer]
        );

        let mut input = unpeered(&a, PeerResolution::NoPeerFound);
        input.skip = true;
        assert!(evaluate(&input).is_empty());
    }

    #[test]
    fn test_skip_exempts_value_checks_only() {
        let a = port("swp1");
        let mut b = port("swp2");
        b.mtu = 1500;
        b.portmode = PortMode::Access;
        let mut input = peered(&a, &b);
        input.skip = true;
        assert_eq!(evaluate(&input), vec![AssertReason::PortModeMismatch]);
    }

    #[test]
    fn test_types_compatible() {
        assert!(types_compatible(&InterfaceType::Bond, &InterfaceType::Bond));
        assert!(types_compatible(&InterfaceType::Vlan, &InterfaceType::Subinterface));
        assert!(!types_compatible(&InterfaceType::Subinterface, &InterfaceType::Vlan));
        assert!(types_compatible(
            &InterfaceType::Ethernet,
            &InterfaceType::Other("ethernet-csmacd".to_string())
        ));
        assert!(!types_compatible(&InterfaceType::Ethernet, &InterfaceType::Bond));
    }

    #[test]
    fn test_addresses_compatible() {
        let list = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(addresses_compatible(&[], &[]));
        assert!(!addresses_compatible(&list(&["10.0.0.0/31"]), &[]));
        assert!(addresses_compatible(&list(&["10.0.0.0/31"]), &list(&["10.0.0.1/31"])));
        assert!(!addresses_compatible(&list(&["10.0.0.0/31"]), &list(&["10.0.0.2/31"])));
        assert!(addresses_compatible(&list(&["10.0.0.9/32"]), &list(&["192.168.1.1/24"])));
        assert!(addresses_compatible(
            &list(&["2001:db8::1/64"]),
            &list(&["2001:db8::2/64"])
        ));
        assert!(!addresses_compatible(&list(&["garbage"]), &list(&["10.0.0.1/31"])));
    }

    #[test]
    fn test_pvid_only_for_switchports() {
        let mut a = port("swp1");
        let mut b = port("swp2");
        a.vlan = 10;
        b.vlan = 20;
        assert_eq!(pvid(&peered(&a, &b)), None);

        a.portmode = PortMode::Access;
        b.portmode = PortMode::Access;
        assert_eq!(pvid(&peered(&a, &b)), Some(AssertReason::PvidMismatch));

        a.portmode = PortMode::Unset;
        assert_eq!(pvid(&peered(&a, &b)), None);
    }

    #[test]
    fn test_vlan_set_and_mlag_exemption() {
        let mut a = port("swp1");
        let mut b = port("swp2");
        a.vlan_list = vec![10, 20];
        b.vlan_list = vec![10];
        assert_eq!(vlan_set(&peered(&a, &b)), Some(AssertReason::VlanSetMismatch));

        let mut input = peered(&a, &b);
        input.mlag_peer_link = true;
        assert_eq!(vlan_set(&input), None);

        b.vlan_list = vec![20, 10];
        assert_eq!(vlan_set(&peered(&a, &b)), None);
    }
}
