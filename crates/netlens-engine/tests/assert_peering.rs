//! Peering assertion scenarios over complete snapshots.

use netlens_engine::{
    AssertKind, AssertRequest, AssertResult, InterfaceQuery, ResultFilter, Value,
};
use netlens_test::{
    column_strings, ethernet, init_test_logging, subinterface, two_leaf_fabric, InterfaceBuilder,
    SnapshotBuilder, VerdictVerifier,
};
use netlens_types::{AdminState, InterfaceType, OperState};
use pretty_assertions::assert_eq;

const NS: &str = "dc1";

fn all() -> InterfaceQuery {
    InterfaceQuery::new()
}

#[test]
fn test_symmetric_peers_pass() {
    init_test_logging();
    let engine = two_leaf_fabric(NS).engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_count(4).unwrap();
    verifier.assert_pass("leaf01", "swp1").unwrap();
    verifier.assert_pass("leaf02", "swp1").unwrap();
    verifier.assert_pass("spine01", "swp1").unwrap();
    verifier.assert_pass("spine01", "swp2").unwrap();

    let leaf = verifier.find("leaf01", "swp1").unwrap();
    assert_eq!(leaf.peer_hostname, "spine01");
    assert_eq!(leaf.peer_ifname, "swp1");
}

#[test]
fn test_mtu_mismatch_fails_both_ends() {
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "leaf01", "swp1").mtu(1500).ip("10.0.0.1/31"))
        .interface(ethernet(NS, "spine01", "swp1").mtu(9000).ip("10.0.0.0/31"))
        .link("leaf01", "swp1", "spine01", "swp1")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_fail("leaf01", "swp1", &["MTU mismatch"]).unwrap();
    verifier.assert_fail("spine01", "swp1", &["MTU mismatch"]).unwrap();
}

#[test]
fn test_missing_peer() {
    let engine = two_leaf_fabric(NS)
        .interface(ethernet(NS, "leaf01", "swp2"))
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    VerdictVerifier::new(&verdicts)
        .assert_fail("leaf01", "swp2", &["No Peer Found"])
        .unwrap();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, true).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_result("leaf01", "swp2", AssertResult::Pass).unwrap();
    verifier.assert_reasons("leaf01", "swp2", &["No Peer Found"]).unwrap();
}

#[test]
fn test_ignore_missing_peer_only_looks_at_first_reason() {
    let engine = two_leaf_fabric(NS)
        .interface(ethernet(NS, "leaf01", "swp2").down("link not ready"))
        .interface(ethernet(NS, "leaf01", "swp3"))
        .engine();

    let query = all().state("all");
    let verdicts = engine.assert_interfaces(&query, ResultFilter::All, true).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier
        .assert_fail("leaf01", "swp2", &["link not ready", "No Peer Found"])
        .unwrap();
    verifier.assert_result("leaf01", "swp3", AssertResult::Pass).unwrap();
}

#[test]
fn test_unpolled_peer() {
    let engine = two_leaf_fabric(NS)
        .interface(ethernet(NS, "leaf01", "swp5"))
        .lldp("leaf01", "swp5", "server01", "eth0")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    VerdictVerifier::new(&verdicts)
        .assert_fail("leaf01", "swp5", &["Unpolled Peer"])
        .unwrap();
}

#[test]
fn test_known_device_without_matching_port_is_not_unpolled() {
    let engine = two_leaf_fabric(NS)
        .interface(ethernet(NS, "leaf01", "swp5"))
        .lldp("leaf01", "swp5", "spine01", "swp48")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    VerdictVerifier::new(&verdicts)
        .assert_fail("leaf01", "swp5", &["No Peer Found"])
        .unwrap();
}

#[test]
fn test_admin_down_has_no_state_reason() {
    let engine = two_leaf_fabric(NS)
        .interface(
            ethernet(NS, "leaf01", "swp3")
                .admin_state(AdminState::Down)
                .state(OperState::Down),
        )
        .interface(ethernet(NS, "spine01", "swp3").admin_state(AdminState::Down).state(OperState::Down))
        .link("leaf01", "swp3", "spine01", "swp3")
        .engine();

    let verdicts = engine
        .assert_interfaces(&all().state("down"), ResultFilter::All, false)
        .unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_count(2).unwrap();
    verifier.assert_pass("leaf01", "swp3").unwrap();
    verifier.assert_pass("spine01", "swp3").unwrap();
}

#[test]
fn test_oper_down_uses_collected_reason() {
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "leaf01", "swp1").down("errDisabled: bpduguard"))
        .interface(ethernet(NS, "spine01", "swp1").down(""))
        .link("leaf01", "swp1", "spine01", "swp1")
        .engine();

    let verdicts = engine
        .assert_interfaces(&all().state("down"), ResultFilter::All, false)
        .unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier
        .assert_fail("leaf01", "swp1", &["errDisabled: bpduguard"])
        .unwrap();
    verifier.assert_fail("spine01", "swp1", &["Interface Down"]).unwrap();
}

#[test]
fn test_unit_zero_collapses_onto_physical_port() {
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "qfx01", "xe-0/0/0"))
        .interface(subinterface(NS, "qfx01", "xe-0/0/0.0").ip("10.0.0.0/31"))
        .interface(ethernet(NS, "leaf01", "swp1").ip("10.0.0.1/31"))
        .link("qfx01", "xe-0/0/0", "leaf01", "swp1")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let qfx: Vec<&str> = verdicts
        .iter()
        .filter(|v| v.hostname == "qfx01")
        .map(|v| v.ifname.as_str())
        .collect();
    assert_eq!(qfx, vec!["xe-0/0/0"]);

    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_pass("qfx01", "xe-0/0/0").unwrap();
    verifier.assert_pass("leaf01", "swp1").unwrap();
}

#[test]
fn test_subinterfaces_pair_on_pvid() {
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "leaf01", "swp1"))
        .interface(ethernet(NS, "leaf02", "swp1"))
        .interface(subinterface(NS, "leaf01", "swp1.10").vlan(10).ip("10.1.0.0/31"))
        .interface(subinterface(NS, "leaf02", "swp1.10").vlan(10).ip("10.1.0.1/31"))
        .interface(subinterface(NS, "leaf02", "swp1.20").vlan(20).ip("10.2.0.1/31").mtu(1500))
        .link("leaf01", "swp1", "leaf02", "swp1")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_pass("leaf01", "swp1.10").unwrap();
    verifier.assert_pass("leaf02", "swp1.10").unwrap();
    verifier
        .assert_fail("leaf02", "swp1.20", &["No Peer Found"])
        .unwrap();
}

#[test]
fn test_pvid_mismatch_on_access_ports() {
    let leaf01 = "interface Ethernet1\n   switchport mode access\n   switchport access vlan 10\n";
    let leaf02 = "interface Ethernet1\n   switchport mode access\n   switchport access vlan 20\n";
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "leaf01", "Ethernet1"))
        .interface(ethernet(NS, "leaf02", "Ethernet1"))
        .config("leaf01", "eos", leaf01)
        .config("leaf02", "eos", leaf02)
        .link("leaf01", "Ethernet1", "leaf02", "Ethernet1")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_fail("leaf01", "Ethernet1", &["pvid Mismatch"]).unwrap();
    verifier.assert_fail("leaf02", "Ethernet1", &["pvid Mismatch"]).unwrap();
}

#[test]
fn test_vlan_set_mismatch_and_mlag_peer_link_exemption() {
    let member = |host: &str| {
        InterfaceBuilder::new(NS, host, "swp49", InterfaceType::BondSlave).master("peerlink")
    };
    let fabric = SnapshotBuilder::new(NS)
        .interface(member("leaf01"))
        .interface(member("leaf02"))
        .vlan("leaf01", 10, &["swp49"])
        .vlan("leaf01", 20, &["swp49"])
        .vlan("leaf02", 10, &["swp49"])
        .link("leaf01", "swp49", "leaf02", "swp49");

    let engine = fabric.clone().engine();
    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_fail("leaf01", "swp49", &["VLAN set mismatch"]).unwrap();
    verifier.assert_fail("leaf02", "swp49", &["VLAN set mismatch"]).unwrap();

    let engine = fabric.mlag("leaf01", "peerlink").engine();
    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_pass("leaf01", "swp49").unwrap();
    verifier.assert_fail("leaf02", "swp49", &["VLAN set mismatch"]).unwrap();
}

#[test]
fn test_no_lldp_data() {
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "leaf01", "swp1"))
        .interface(ethernet(NS, "leaf01", "swp2"))
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_count(2).unwrap();
    verifier
        .assert_fail("leaf01", "swp1", &["No LLDP peering info"])
        .unwrap();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::Pass, false).unwrap();
    assert!(verdicts.is_empty());
}

#[test]
fn test_empty_interface_set() {
    let engine = two_leaf_fabric(NS).engine();
    let query = all().hostname(["nosuchhost"]);
    let verdicts = engine.assert_interfaces(&query, ResultFilter::All, false).unwrap();
    assert!(verdicts.is_empty());
}

#[test]
fn test_hostname_scope_still_resolves_peers() {
    let engine = two_leaf_fabric(NS).engine();
    let query = all().hostname(["leaf01"]);

    let verdicts = engine.assert_interfaces(&query, ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_count(1).unwrap();
    verifier.assert_pass("leaf01", "swp1").unwrap();
}

#[test]
fn test_caller_filters_do_not_hide_peers() {
    let engine = two_leaf_fabric(NS).engine();

    for query in [
        all().hostname(["leaf01"]).ifname(["swp1"]),
        all().hostname(["leaf01"]).query_expr("ifname == 'swp1'"),
        all().hostname(["leaf01"]).portmode("routed"),
    ] {
        let verdicts = engine.assert_interfaces(&query, ResultFilter::All, false).unwrap();
        let verifier = VerdictVerifier::new(&verdicts);
        verifier.assert_pass("leaf01", "swp1").unwrap();
        verifier.assert_absent("spine01", "swp1").unwrap();
        verifier.assert_absent("spine01", "swp2").unwrap();
        assert_eq!(verifier.find("leaf01", "swp1").unwrap().peer_hostname, "spine01");
    }
}

#[test]
fn test_peer_device_with_only_down_ports_is_polled() {
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "leaf01", "swp1").ip("10.0.0.1/31"))
        .interface(ethernet(NS, "spine01", "swp3").ip("10.0.0.0/31").state(OperState::Down))
        .link("leaf01", "swp1", "spine01", "swp3")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_count(1).unwrap();
    verifier.assert_fail("leaf01", "swp1", &["No Peer Found"]).unwrap();
}

#[test]
fn test_members_and_vlan_interfaces_are_not_peered() {
    let engine = two_leaf_fabric(NS)
        .interface(ethernet(NS, "leaf01", "swp5").master("bridge"))
        .interface(
            InterfaceBuilder::new(NS, "leaf01", "swp6", InterfaceType::BondSlave).master("bond1"),
        )
        .interface(
            InterfaceBuilder::new(NS, "leaf01", "swp7", InterfaceType::BondSlave).master("bond1"),
        )
        .interface(InterfaceBuilder::new(NS, "leaf01", "vlan10", InterfaceType::Vlan).vlan(10))
        .interface(ethernet(NS, "leaf01", "swp8"))
        .lldp("leaf01", "swp7", "server01", "eth0")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_pass("leaf01", "swp5").unwrap();
    verifier.assert_pass("leaf01", "swp6").unwrap();
    verifier.assert_pass("leaf01", "swp7").unwrap();
    verifier.assert_pass("leaf01", "vlan10").unwrap();
    verifier.assert_fail("leaf01", "swp8", &["No Peer Found"]).unwrap();
}

#[test]
fn test_speed_mismatch() {
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "leaf01", "swp1").speed(10_000).ip("10.0.0.1/31"))
        .interface(ethernet(NS, "spine01", "swp1").ip("10.0.0.0/31"))
        .link("leaf01", "swp1", "spine01", "swp1")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_fail("leaf01", "swp1", &["Speed mismatch"]).unwrap();
    verifier.assert_fail("spine01", "swp1", &["Speed mismatch"]).unwrap();
}

#[test]
fn test_type_mismatch() {
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "leaf01", "swp1").ip("10.0.0.1/31"))
        .interface(
            InterfaceBuilder::new(NS, "spine01", "bond1", InterfaceType::Bond).ip("10.0.0.0/31"),
        )
        .link("leaf01", "swp1", "spine01", "bond1")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_fail("leaf01", "swp1", &["type mismatch"]).unwrap();
    verifier.assert_fail("spine01", "bond1", &["type mismatch"]).unwrap();
}

#[test]
fn test_ip_address_mismatch() {
    let engine = SnapshotBuilder::new(NS)
        .interface(ethernet(NS, "leaf01", "swp1").ip("10.0.0.1/31"))
        .interface(ethernet(NS, "spine01", "swp1").ip("10.0.1.0/31"))
        .link("leaf01", "swp1", "spine01", "swp1")
        .engine();

    let verdicts = engine.assert_interfaces(&all(), ResultFilter::All, false).unwrap();
    let verifier = VerdictVerifier::new(&verdicts);
    verifier.assert_fail("leaf01", "swp1", &["IP address mismatch"]).unwrap();
    verifier.assert_fail("spine01", "swp1", &["IP address mismatch"]).unwrap();
}

#[test]
fn test_result_filter() {
    let engine = two_leaf_fabric(NS)
        .interface(ethernet(NS, "leaf01", "swp2"))
        .engine();

    let failed = engine.assert_interfaces(&all(), ResultFilter::Fail, false).unwrap();
    let names: Vec<(&str, &str)> = failed
        .iter()
        .map(|v| (v.hostname.as_str(), v.ifname.as_str()))
        .collect();
    assert_eq!(names, vec![("leaf01", "swp2")]);

    let passed = engine.assert_interfaces(&all(), ResultFilter::Pass, false).unwrap();
    assert_eq!(passed.len(), 4);
    assert!(passed.iter().all(|v| v.result == AssertResult::Pass));
}

#[test]
fn test_verdicts_are_deterministic_and_sorted() {
    let engine = two_leaf_fabric(NS)
        .interface(ethernet(NS, "leaf02", "swp9").mtu(1500).down(""))
        .interface(ethernet(NS, "spine01", "swp9"))
        .link("leaf02", "swp9", "spine01", "swp9")
        .engine();

    let query = all().state("all");
    let first = engine.assert_interfaces(&query, ResultFilter::All, false).unwrap();
    let second = engine.assert_interfaces(&query, ResultFilter::All, false).unwrap();
    assert_eq!(first, second);

    let keys: Vec<(&str, &str)> = first
        .iter()
        .map(|v| (v.hostname.as_str(), v.ifname.as_str()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    VerdictVerifier::new(&first)
        .assert_fail("leaf02", "swp9", &["Interface Down", "MTU mismatch"])
        .unwrap();
}

#[test]
fn test_placeholder_reason_iff_pass() {
    let engine = two_leaf_fabric(NS)
        .interface(ethernet(NS, "leaf01", "swp2"))
        .interface(ethernet(NS, "leaf02", "swp2").mtu(1500))
        .link("leaf01", "swp2", "leaf02", "swp2")
        .engine();

    let request = AssertRequest {
        what: AssertKind::Peering,
        ..Default::default()
    };
    let table = engine.aver(&request).unwrap();
    assert_eq!(
        table.columns,
        vec![
            "namespace",
            "hostname",
            "ifname",
            "state",
            "peerHostname",
            "peerIfname",
            "result",
            "assertReason",
            "timestamp",
        ]
    );

    let results = column_strings(&table, "result").unwrap();
    for (idx, result) in results.iter().enumerate() {
        let reason = table.value(idx, "assertReason").unwrap();
        let is_placeholder = *reason == Value::Str("-".to_string());
        assert_eq!(is_placeholder, result == "pass", "row {}", idx);
    }
    assert!(results.iter().any(|r| r == "fail"));
}
