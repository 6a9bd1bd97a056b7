//! Per-namespace interface rollups.

use crate::accessor::TableAccessor;
use crate::engine::InterfacesEngine;
use crate::error::NetlensResult;
use crate::query::InterfaceQuery;
use crate::records::InterfaceRecord;
use crate::table::{Record, Table, Value};
use itertools::Itertools;
use netlens_types::{AdminState, InterfaceType, IpAddress, OperState};
use std::collections::{BTreeMap, HashSet};
use tracing::instrument;

pub const SUMMARY_COLUMNS: &[&str] = &[
    "namespace",
    "deviceCnt",
    "interfaceCnt",
    "devicesWithL2Cnt",
    "devicesWithVxlanCnt",
    "ifDownCnt",
    "ifAdminDownCnt",
    "ifWithMultipleIPCnt",
    "uniqueMTUCnt",
    "uniqueIfTypesCnt",
    "speedCnt",
    "ifChangesStat",
    "ifPerDeviceStat",
    "uniqueIPv4AddrCnt",
    "uniqueIPv6AddrCnt",
];

/// Minimum, maximum and median of a set of counts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stat {
    pub min: u64,
    pub max: u64,
    pub median: f64,
}

impl Stat {
    /// Computes the triple; an empty input yields all zeros.
    pub fn from_values(values: impl IntoIterator<Item = u64>) -> Self {
        let sorted: Vec<u64> = values.into_iter().sorted().collect();
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Stat::default();
        };
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
        } else {
            sorted[mid] as f64
        };
        Stat { min, max, median }
    }
}

impl From<Stat> for Value {
    fn from(stat: Stat) -> Self {
        Value::List(vec![stat.min.into(), stat.max.into(), stat.median.into()])
    }
}

/// Rollup of one namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceSummary {
    pub namespace: String,
    pub device_cnt: usize,
    pub interface_cnt: usize,
    pub devices_with_l2_cnt: usize,
    pub devices_with_vxlan_cnt: usize,
    pub if_down_cnt: usize,
    pub if_admin_down_cnt: usize,
    pub if_with_multiple_ip_cnt: usize,
    pub unique_mtu_cnt: usize,
    pub unique_if_types_cnt: usize,
    pub speed_cnt: usize,
    pub if_changes_stat: Stat,
    pub if_per_device_stat: Stat,
    pub unique_ipv4_addr_cnt: usize,
    pub unique_ipv6_addr_cnt: usize,
}

impl Record for NamespaceSummary {
    fn field(&self, name: &str) -> Option<Value> {
        let value: Value = match name {
            "namespace" => self.namespace.as_str().into(),
            "deviceCnt" => self.device_cnt.into(),
            "interfaceCnt" => self.interface_cnt.into(),
            "devicesWithL2Cnt" => self.devices_with_l2_cnt.into(),
            "devicesWithVxlanCnt" => self.devices_with_vxlan_cnt.into(),
            "ifDownCnt" => self.if_down_cnt.into(),
            "ifAdminDownCnt" => self.if_admin_down_cnt.into(),
            "ifWithMultipleIPCnt" => self.if_with_multiple_ip_cnt.into(),
            "uniqueMTUCnt" => self.unique_mtu_cnt.into(),
            "uniqueIfTypesCnt" => self.unique_if_types_cnt.into(),
            "speedCnt" => self.speed_cnt.into(),
            "ifChangesStat" => self.if_changes_stat.into(),
            "ifPerDeviceStat" => self.if_per_device_stat.into(),
            "uniqueIPv4AddrCnt" => self.unique_ipv4_addr_cnt.into(),
            "uniqueIPv6AddrCnt" => self.unique_ipv6_addr_cnt.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// Address part of a CIDR string.
fn address_of(cidr: &str) -> &str {
    cidr.split_once('/').map_or(cidr, |(addr, _)| addr)
}

fn is_link_local_v6(cidr: &str) -> bool {
    match address_of(cidr).parse::<IpAddress>() {
        Ok(addr) => addr.is_link_local(),
        Err(_) => cidr.to_lowercase().starts_with("fe80:"),
    }
}

fn summarize_namespace(namespace: &str, rows: &[&InterfaceRecord], bridge: &str) -> NamespaceSummary {
    let distinct_hosts = |pred: &dyn Fn(&InterfaceRecord) -> bool| {
        rows.iter()
            .filter(|&&r| pred(r))
            .map(|r| r.hostname.as_str())
            .unique()
            .count()
    };
    // Linux loopbacks report an unknown operational state.
    let is_up = |r: &InterfaceRecord| matches!(r.state, OperState::Up | OperState::Unknown);

    let per_device = rows.iter().counts_by(|r| r.hostname.as_str());

    let ipv4: HashSet<&str> = rows
        .iter()
        .flat_map(|r| r.ip_address_list.iter().map(String::as_str))
        .collect();
    let ipv6: HashSet<&str> = rows
        .iter()
        .flat_map(|r| r.ip6_address_list.iter().map(String::as_str))
        .filter(|a| !is_link_local_v6(a))
        .collect();

    NamespaceSummary {
        namespace: namespace.to_string(),
        device_cnt: per_device.len(),
        interface_cnt: rows.len(),
        devices_with_l2_cnt: distinct_hosts(&|r: &InterfaceRecord| r.master == bridge),
        devices_with_vxlan_cnt: distinct_hosts(&|r: &InterfaceRecord| r.if_type == InterfaceType::Vxlan),
        if_down_cnt: rows
            .iter()
            .filter(|&&r| !is_up(r) && r.admin_state == AdminState::Up)
            .count(),
        if_admin_down_cnt: rows.iter().filter(|r| r.admin_state != AdminState::Up).count(),
        if_with_multiple_ip_cnt: rows.iter().filter(|r| r.ip_address_list.len() > 1).count(),
        unique_mtu_cnt: rows.iter().map(|r| r.mtu).unique().count(),
        unique_if_types_cnt: rows.iter().map(|r| &r.if_type).unique().count(),
        speed_cnt: rows.iter().map(|r| r.speed).unique().count(),
        if_changes_stat: Stat::from_values(
            rows.iter()
                .filter(|r| r.if_type != InterfaceType::Bond)
                .map(|r| r.num_changes),
        ),
        if_per_device_stat: Stat::from_values(per_device.values().map(|&n| n as u64)),
        unique_ipv4_addr_cnt: ipv4.len(),
        unique_ipv6_addr_cnt: ipv6.len(),
    }
}

impl<A: TableAccessor> InterfacesEngine<A> {
    /// Computes one rollup per namespace over the filtered interfaces.
    pub fn summarize_records(&self, query: &InterfaceQuery) -> NetlensResult<Vec<NamespaceSummary>> {
        let rows = self.get_records(query)?;
        let bridge = self.config.portmode.bridge_ifname.as_str();

        let mut by_namespace: BTreeMap<&str, Vec<&InterfaceRecord>> = BTreeMap::new();
        for row in &rows {
            by_namespace.entry(row.namespace.as_str()).or_default().push(row);
        }

        Ok(by_namespace
            .into_iter()
            .map(|(namespace, rows)| summarize_namespace(namespace, &rows, bridge))
            .collect())
    }

    /// Rollup table, one row per namespace.
    #[instrument(skip(self))]
    pub fn summarize(&self, query: &InterfaceQuery) -> NetlensResult<Table> {
        let summaries = self.summarize_records(query)?;
        let columns: Vec<String> = SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect();
        Ok(Table::from_records(&summaries, &columns))
    }
}
