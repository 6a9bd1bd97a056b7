//! Interface assertions.
//!
//! The peering assertion checks every interface against its LLDP-discovered
//! link partner; the MTU value assertion checks MTUs against an allowed set.

mod join;
mod mtu;
mod rules;

pub use mtu::MtuVerdict;
pub use rules::{addresses_compatible, types_compatible, Rule, RuleInput, RULES};

use crate::accessor::TableAccessor;
use crate::engine::InterfacesEngine;
use crate::error::{NetlensError, NetlensResult};
use crate::query::InterfaceQuery;
use crate::records::{InterfaceKey, InterfaceRecord};
use crate::schema::Columns;
use crate::table::{Record, Table, Value};
use netlens_types::{InterfaceType, OperState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Rendering of an empty reason list.
pub const NO_REASON: &str = "-";

/// Column order of peering verdict tables.
pub const VERDICT_COLUMNS: &[&str] = &[
    "namespace",
    "hostname",
    "ifname",
    "state",
    "peerHostname",
    "peerIfname",
    "result",
    "assertReason",
    "timestamp",
];

/// Outcome of one assertion row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertResult {
    Pass,
    Fail,
}

impl AssertResult {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssertResult::Pass => "pass",
            AssertResult::Fail => "fail",
        }
    }
}

impl fmt::Display for AssertResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which verdicts to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFilter {
    #[default]
    All,
    Pass,
    Fail,
}

impl ResultFilter {
    pub fn accepts(&self, result: AssertResult) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::Pass => result == AssertResult::Pass,
            ResultFilter::Fail => result == AssertResult::Fail,
        }
    }
}

impl FromStr for ResultFilter {
    type Err = NetlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(ResultFilter::All),
            "pass" => Ok(ResultFilter::Pass),
            "fail" => Ok(ResultFilter::Fail),
            other => Err(NetlensError::invalid_filter(
                "result",
                format!("'{}' is not one of all, pass, fail", other),
            )),
        }
    }
}

/// Why an interface failed the peering assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssertReason {
    /// Carries the collected down reason, or "Interface Down".
    InterfaceDown(String),
    NoPeerFound,
    UnpolledPeer,
    MtuMismatch,
    SpeedMismatch,
    TypeMismatch,
    PortModeMismatch,
    IpAddressMismatch,
    PvidMismatch,
    VlanSetMismatch,
    NoLldpPeering,
}

impl AssertReason {
    pub fn interface_down(reason: &str) -> Self {
        if reason.is_empty() {
            AssertReason::InterfaceDown("Interface Down".to_string())
        } else {
            AssertReason::InterfaceDown(reason.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssertReason::InterfaceDown(reason) => reason,
            AssertReason::NoPeerFound => "No Peer Found",
            AssertReason::UnpolledPeer => "Unpolled Peer",
            AssertReason::MtuMismatch => "MTU mismatch",
            AssertReason::SpeedMismatch => "Speed mismatch",
            AssertReason::TypeMismatch => "type mismatch",
            AssertReason::PortModeMismatch => "portMode Mismatch",
            AssertReason::IpAddressMismatch => "IP address mismatch",
            AssertReason::PvidMismatch => "pvid Mismatch",
            AssertReason::VlanSetMismatch => "VLAN set mismatch",
            AssertReason::NoLldpPeering => "No LLDP peering info",
        }
    }
}

impl fmt::Display for AssertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a local interface's link partner was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerResolution {
    /// Index of the peer in the working set.
    Resolved(usize),
    NoPeerFound,
    /// The peer device was never polled.
    PeerUnpolled,
}

/// Peering assertion outcome for one interface.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionVerdict {
    pub namespace: String,
    pub hostname: String,
    pub ifname: String,
    pub state: OperState,
    pub peer_hostname: String,
    pub peer_ifname: String,
    pub result: AssertResult,
    pub assert_reason: Vec<AssertReason>,
    pub timestamp: i64,
}

impl AssertionVerdict {
    fn new(row: &InterfaceRecord, peer_hostname: &str, peer_ifname: &str) -> Self {
        Self {
            namespace: row.namespace.clone(),
            hostname: row.hostname.clone(),
            ifname: row.ifname.clone(),
            state: row.state,
            peer_hostname: peer_hostname.to_string(),
            peer_ifname: peer_ifname.to_string(),
            result: AssertResult::Pass,
            assert_reason: Vec::new(),
            timestamp: row.timestamp,
        }
    }

    /// Reasons as display strings.
    pub fn reasons(&self) -> Vec<&str> {
        self.assert_reason.iter().map(AssertReason::as_str).collect()
    }
}

impl Record for AssertionVerdict {
    fn field(&self, name: &str) -> Option<Value> {
        let value: Value = match name {
            "namespace" => self.namespace.as_str().into(),
            "hostname" => self.hostname.as_str().into(),
            "ifname" => self.ifname.as_str().into(),
            "state" => self.state.as_str().into(),
            "peerHostname" => self.peer_hostname.as_str().into(),
            "peerIfname" => self.peer_ifname.as_str().into(),
            "result" => self.result.as_str().into(),
            "assertReason" if self.assert_reason.is_empty() => NO_REASON.into(),
            "assertReason" => self.reasons().into(),
            "timestamp" => self.timestamp.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// The assertion to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssertKind {
    #[default]
    Peering,
    MtuValue,
}

impl FromStr for AssertKind {
    type Err = NetlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "peering" => Ok(AssertKind::Peering),
            "mtu-value" => Ok(AssertKind::MtuValue),
            other => Err(NetlensError::invalid_filter(
                "what",
                format!("'{}' is not one of peering, mtu-value", other),
            )),
        }
    }
}

/// Arguments of [`InterfacesEngine::aver`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssertRequest {
    pub what: AssertKind,
    pub result: ResultFilter,
    pub ignore_missing_peer: bool,
    /// Allowed MTUs for [`AssertKind::MtuValue`].
    pub matchval: Vec<String>,
    pub query: InterfaceQuery,
}

/// Verdict for rows that never reached peer resolution.
fn unpeered_verdicts(rows: &[InterfaceRecord], reason: AssertReason) -> Vec<AssertionVerdict> {
    rows.iter()
        .map(|row| {
            let mut verdict = AssertionVerdict::new(row, "", "");
            verdict.result = AssertResult::Fail;
            verdict.assert_reason = vec![reason.clone()];
            verdict
        })
        .collect()
}

impl<A: TableAccessor> InterfacesEngine<A> {
    /// Runs the named assertion and returns its table.
    pub fn aver(&self, request: &AssertRequest) -> NetlensResult<Table> {
        match request.what {
            AssertKind::Peering => {
                let verdicts = self.assert_interfaces(
                    &request.query,
                    request.result,
                    request.ignore_missing_peer,
                )?;
                let columns: Vec<String> = VERDICT_COLUMNS.iter().map(|c| c.to_string()).collect();
                Ok(Table::from_records(&verdicts, &columns))
            }
            AssertKind::MtuValue => {
                let verdicts =
                    self.assert_mtu_value(&request.matchval, request.result, &request.query)?;
                let columns: Vec<String> =
                    mtu::MTU_COLUMNS.iter().map(|c| c.to_string()).collect();
                Ok(Table::from_records(&verdicts, &columns))
            }
        }
    }

    /// Checks every interface in scope against its link partner.
    ///
    /// Without a type or state filter the configured defaults apply. Peers
    /// are looked up among every interface of the namespace that passes the
    /// type and state filters; the remaining filters only select which
    /// interfaces get a verdict. Verdicts come back sorted by interface
    /// identity.
    #[instrument(skip(self, query), fields(namespace = ?query.namespace, hostname = ?query.hostname))]
    pub fn assert_interfaces(
        &self,
        query: &InterfaceQuery,
        result_filter: ResultFilter,
        ignore_missing_peer: bool,
    ) -> NetlensResult<Vec<AssertionVerdict>> {
        let defaults = &self.config.assertion;
        let mut local_query = query.clone();
        if local_query.types.is_empty() {
            local_query.types = defaults.default_types.clone();
        }
        if local_query.state.as_deref().map_or(true, str::is_empty) {
            local_query.state = Some(defaults.default_state.clone());
        }

        let mut peer_query = InterfaceQuery::new()
            .namespace(query.namespace.iter().cloned())
            .types(local_query.types.iter().cloned())
            .columns(Columns::All);
        peer_query.state = local_query.state.clone();

        let scope = query.scope()?;
        let in_scope = self.get_records(&local_query)?;
        if in_scope.is_empty() {
            debug!("no interfaces to assert");
            return Ok(Vec::new());
        }
        let candidates = self.get_records(&peer_query)?;

        let lldp = self.accessor.lldp(&scope)?;
        let mut rows = join::normalize(candidates);
        if !join::attach_lldp(&mut rows, &lldp) {
            info!(interfaces = in_scope.len(), "no LLDP peering info");
            if result_filter == ResultFilter::Pass {
                return Ok(Vec::new());
            }
            let normalized: Vec<InterfaceRecord> = join::normalize(in_scope)
                .into_iter()
                .map(|row| row.record)
                .collect();
            return Ok(unpeered_verdicts(&normalized, AssertReason::NoLldpPeering));
        }

        let local_keys: HashSet<InterfaceKey> = join::normalize(in_scope)
            .into_iter()
            .map(|row| row.record.key())
            .collect();

        let mut known_hosts: HashSet<(String, String)> =
            rows.iter().map(|r| r.record.host_key()).collect();
        known_hosts.extend(
            self.accessor
                .interfaces(&scope.namespace_only())?
                .iter()
                .map(InterfaceRecord::host_key),
        );
        known_hosts.extend(
            self.accessor
                .devices(&scope.namespace_only())?
                .into_iter()
                .map(|d| (d.namespace, d.hostname)),
        );

        let peer_links: HashSet<(String, String, String)> = self
            .accessor
            .mlag(&scope)?
            .into_iter()
            .map(|m| (m.namespace, m.hostname, m.peer_link))
            .collect();

        let resolutions = join::resolve_peers(&rows, &known_hosts);
        let bridge = self.config.portmode.bridge_ifname.as_str();

        let mut verdicts = Vec::new();
        for (row, resolution) in rows.iter().zip(&resolutions) {
            let local = &row.record;
            if !local_keys.contains(&local.key()) {
                continue;
            }

            let peer = match resolution {
                PeerResolution::Resolved(idx) => rows.get(*idx).map(|p| &p.record),
                _ => None,
            };
            let input = RuleInput {
                local,
                peer,
                resolution: *resolution,
                skip: local.master == bridge
                    || matches!(local.if_type, InterfaceType::BondSlave | InterfaceType::Vlan),
                mlag_peer_link: peer_links.contains(&(
                    local.namespace.clone(),
                    local.hostname.clone(),
                    local.master.clone(),
                )),
            };

            let mut verdict = AssertionVerdict::new(local, &row.peer_hostname, &row.peer_ifname);
            verdict.assert_reason = rules::evaluate(&input);
            let failed = match verdict.assert_reason.first() {
                None => false,
                Some(AssertReason::NoPeerFound) if ignore_missing_peer => false,
                Some(_) => true,
            };
            if failed {
                verdict.result = AssertResult::Fail;
            }
            if result_filter.accepts(verdict.result) {
                verdicts.push(verdict);
            }
        }

        verdicts.sort_by(|a, b| {
            (&a.namespace, &a.hostname, &a.ifname).cmp(&(&b.namespace, &b.hostname, &b.ifname))
        });
        debug!(verdicts = verdicts.len(), "peering assertion done");
        Ok(verdicts)
    }
}
