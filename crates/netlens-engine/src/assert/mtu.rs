//! MTU value assertion.

use super::{AssertResult, ResultFilter};
use crate::accessor::TableAccessor;
use crate::engine::InterfacesEngine;
use crate::error::{NetlensError, NetlensResult};
use crate::query::InterfaceQuery;
use crate::records::InterfaceRecord;
use crate::table::{Record, Value};
use netlens_types::{InterfaceType, OperState};
use std::collections::BTreeSet;
use tracing::instrument;

pub(super) const MTU_COLUMNS: &[&str] = &[
    "namespace",
    "hostname",
    "ifname",
    "state",
    "mtu",
    "timestamp",
    "result",
];

/// MTU assertion outcome for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtuVerdict {
    pub namespace: String,
    pub hostname: String,
    pub ifname: String,
    pub state: OperState,
    pub mtu: u32,
    pub timestamp: i64,
    pub result: AssertResult,
}

impl Record for MtuVerdict {
    fn field(&self, name: &str) -> Option<Value> {
        let value: Value = match name {
            "namespace" => self.namespace.as_str().into(),
            "hostname" => self.hostname.as_str().into(),
            "ifname" => self.ifname.as_str().into(),
            "state" => self.state.as_str().into(),
            "mtu" => self.mtu.into(),
            "timestamp" => self.timestamp.into(),
            "result" => self.result.as_str().into(),
            _ => return None,
        };
        Some(value)
    }
}

fn parse_matchval(matchval: &[String]) -> NetlensResult<BTreeSet<u32>> {
    matchval
        .iter()
        .map(|v| {
            v.trim().parse::<u32>().map_err(|_| {
                NetlensError::invalid_filter("matchval", format!("'{}' is not an integer", v))
            })
        })
        .collect()
}

impl<A: TableAccessor> InterfacesEngine<A> {
    /// Checks that every non-loopback interface has one of the allowed MTUs.
    ///
    /// # Errors
    ///
    /// Returns [`NetlensError::InvalidFilter`] if a `matchval` entry is not an
    /// integer.
    #[instrument(skip(self, query))]
    pub fn assert_mtu_value(
        &self,
        matchval: &[String],
        result_filter: ResultFilter,
        query: &InterfaceQuery,
    ) -> NetlensResult<Vec<MtuVerdict>> {
        let allowed = parse_matchval(matchval)?;
        let loopbacks = &self.config.assertion.loopback_ifnames;
        let is_loopback = |row: &InterfaceRecord| {
            row.if_type == InterfaceType::Loopback || loopbacks.contains(&row.ifname)
        };

        let verdicts = self
            .get_records(query)?
            .into_iter()
            .filter(|row| !is_loopback(row))
            .map(|row| MtuVerdict {
                result: if allowed.contains(&row.mtu) {
                    AssertResult::Pass
                } else {
                    AssertResult::Fail
                },
                namespace: row.namespace,
                hostname: row.hostname,
                ifname: row.ifname,
                state: row.state,
                mtu: row.mtu,
                timestamp: row.timestamp,
            })
            .filter(|v| result_filter.accepts(v.result))
            .collect();
        Ok(verdicts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_matchval() {
        let vals = vec!["1500".to_string(), " 9216".to_string()];
        assert_eq!(parse_matchval(&vals).unwrap(), BTreeSet::from([1500, 9216]));

        let err = parse_matchval(&["jumbo".to_string()]).unwrap_err();
        assert!(err.is_caller_error());
        assert_eq!(
            err.to_string(),
            "Invalid value for filter matchval: 'jumbo' is not an integer"
        );
    }
}
