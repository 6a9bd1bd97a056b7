//! Latest-state table retrieval.
//!
//! The engine reads every table through [`TableAccessor`]. [`MemoryAccessor`]
//! serves a [`Snapshot`] loaded from JSON and keeps only the most recent
//! record per identity, which is what makes interface identity unique in
//! query results.

use crate::error::NetlensResult;
use crate::filter::NameFilter;
use crate::records::{
    DevConfigRecord, DeviceRecord, InterfaceRecord, LldpRecord, MlagRecord, VlanRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Namespace and hostname scope of a table fetch.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub namespace: NameFilter,
    pub hostname: NameFilter,
}

impl Scope {
    /// A scope covering every namespace and host.
    pub fn all() -> Self {
        Self::default()
    }

    /// Compiles namespace and hostname filter terms.
    pub fn new<S: AsRef<str>>(namespace: &[S], hostname: &[S]) -> NetlensResult<Self> {
        Ok(Self {
            namespace: NameFilter::new("namespace", namespace)?,
            hostname: NameFilter::new("hostname", hostname)?,
        })
    }

    /// A scope restricted to the namespaces and hosts of the given records.
    pub fn covering(rows: &[InterfaceRecord]) -> Self {
        let namespaces: std::collections::BTreeSet<&str> =
            rows.iter().map(|r| r.namespace.as_str()).collect();
        let hosts: std::collections::BTreeSet<&str> =
            rows.iter().map(|r| r.hostname.as_str()).collect();
        Self {
            namespace: NameFilter::exact(namespaces),
            hostname: NameFilter::exact(hosts),
        }
    }

    /// Keeps only the namespace part of this scope.
    pub fn namespace_only(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            hostname: NameFilter::default(),
        }
    }

    pub fn contains(&self, namespace: &str, hostname: &str) -> bool {
        self.namespace.matches(namespace) && self.hostname.matches(hostname)
    }
}

/// Read access to the collected state tables.
pub trait TableAccessor {
    fn interfaces(&self, scope: &Scope) -> NetlensResult<Vec<InterfaceRecord>>;

    fn lldp(&self, scope: &Scope) -> NetlensResult<Vec<LldpRecord>>;

    fn mlag(&self, scope: &Scope) -> NetlensResult<Vec<MlagRecord>>;

    fn vlans(&self, scope: &Scope) -> NetlensResult<Vec<VlanRecord>>;

    fn devconfig(&self, scope: &Scope) -> NetlensResult<Vec<DevConfigRecord>>;

    fn devices(&self, scope: &Scope) -> NetlensResult<Vec<DeviceRecord>>;
}

/// A point-in-time dump of all tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub interfaces: Vec<InterfaceRecord>,
    pub lldp: Vec<LldpRecord>,
    pub mlag: Vec<MlagRecord>,
    pub vlan: Vec<VlanRecord>,
    pub devconfig: Vec<DevConfigRecord>,
    pub device: Vec<DeviceRecord>,
}

impl Snapshot {
    pub fn from_json_str(content: &str) -> NetlensResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> NetlensResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            interfaces = snapshot.interfaces.len(),
            lldp = snapshot.lldp.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

/// Keeps the record with the highest timestamp for each key, ordered by key.
fn latest<T, K, F, G>(records: Vec<T>, key: F, timestamp: G) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
    G: Fn(&T) -> i64,
{
    let mut latest: BTreeMap<K, T> = BTreeMap::new();
    for record in records {
        let k = key(&record);
        match latest.get(&k) {
            Some(existing) if timestamp(existing) > timestamp(&record) => {}
            _ => {
                latest.insert(k, record);
            }
        }
    }
    latest.into_values().collect()
}

/// In-memory [`TableAccessor`] over a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessor {
    snapshot: Snapshot,
}

impl MemoryAccessor {
    pub fn new(snapshot: Snapshot) -> Self {
        let Snapshot {
            interfaces,
            lldp,
            mlag,
            vlan,
            devconfig,
            device,
        } = snapshot;

        let snapshot = Snapshot {
            interfaces: latest(
                interfaces,
                |r| (r.namespace.clone(), r.hostname.clone(), r.ifname.clone()),
                |r| r.timestamp,
            ),
            lldp: latest(
                lldp,
                |r| (r.namespace.clone(), r.hostname.clone(), r.ifname.clone()),
                |r| r.timestamp,
            ),
            mlag: latest(
                mlag,
                |r| (r.namespace.clone(), r.hostname.clone()),
                |r| r.timestamp,
            ),
            vlan: latest(
                vlan,
                |r| (r.namespace.clone(), r.hostname.clone(), r.vlan),
                |r| r.timestamp,
            ),
            devconfig: latest(
                devconfig,
                |r| (r.namespace.clone(), r.hostname.clone()),
                |r| r.timestamp,
            ),
            device: latest(
                device,
                |r| (r.namespace.clone(), r.hostname.clone()),
                |r| r.timestamp,
            ),
        };
        debug!(
            interfaces = snapshot.interfaces.len(),
            devices = snapshot.device.len(),
            "indexed snapshot"
        );
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

fn scoped<T: Clone>(
    records: &[T],
    scope: &Scope,
    host: impl Fn(&T) -> (&str, &str),
) -> Vec<T> {
    records
        .iter()
        .filter(|r| {
            let (namespace, hostname) = host(r);
            scope.contains(namespace, hostname)
        })
        .cloned()
        .collect()
}

impl TableAccessor for MemoryAccessor {
    fn interfaces(&self, scope: &Scope) -> NetlensResult<Vec<InterfaceRecord>> {
        Ok(scoped(&self.snapshot.interfaces, scope, |r| {
            (r.namespace.as_str(), r.hostname.as_str())
        }))
    }

    fn lldp(&self, scope: &Scope) -> NetlensResult<Vec<LldpRecord>> {
        Ok(scoped(&self.snapshot.lldp, scope, |r| {
            (r.namespace.as_str(), r.hostname.as_str())
        }))
    }

    fn mlag(&self, scope: &Scope) -> NetlensResult<Vec<MlagRecord>> {
        Ok(scoped(&self.snapshot.mlag, scope, |r| {
            (r.namespace.as_str(), r.hostname.as_str())
        }))
    }

    fn vlans(&self, scope: &Scope) -> NetlensResult<Vec<VlanRecord>> {
        Ok(scoped(&self.snapshot.vlan, scope, |r| {
            (r.namespace.as_str(), r.hostname.as_str())
        }))
    }

    fn devconfig(&self, scope: &Scope) -> NetlensResult<Vec<DevConfigRecord>> {
        Ok(scoped(&self.snapshot.devconfig, scope, |r| {
            (r.namespace.as_str(), r.hostname.as_str())
        }))
    }

    fn devices(&self, scope: &Scope) -> NetlensResult<Vec<DeviceRecord>> {
        Ok(scoped(&self.snapshot.device, scope, |r| {
            (r.namespace.as_str(), r.hostname.as_str())
        }))
    }
}
