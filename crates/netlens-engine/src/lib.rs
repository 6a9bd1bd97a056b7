//! Analytic engine over collected network state tables.
//!
//! The engine reads per-device interface, LLDP, MLAG, VLAN, device and
//! configuration tables through a [`TableAccessor`] and provides:
//!
//! - [`InterfacesEngine::get`]: filtered, projected interface queries
//! - [`InterfacesEngine::derive_portmode`] and
//!   [`InterfacesEngine::derive_vlanlist`]: switchport enrichment
//! - [`InterfacesEngine::assert_interfaces`]: peer-consistency verdicts
//! - [`InterfacesEngine::assert_mtu_value`]: MTU allow-list verdicts
//! - [`InterfacesEngine::summarize`] and [`InterfacesEngine::top`]: rollups
//!
//! # Example
//!
//! ```
//! use netlens_engine::{
//!     EngineConfig, InterfaceQuery, InterfacesEngine, MemoryAccessor, Snapshot,
//! };
//!
//! let snapshot = Snapshot::from_json_str(r#"{
//!     "interfaces": [
//!         {"namespace": "dc1", "hostname": "leaf01", "ifname": "swp1",
//!          "type": "ethernet", "state": "up", "adminState": "up", "mtu": 9216}
//!     ]
//! }"#).unwrap();
//! let engine = InterfacesEngine::new(MemoryAccessor::new(snapshot), EngineConfig::default());
//!
//! let table = engine.get(&InterfaceQuery::new().hostname(["leaf01"])).unwrap();
//! assert_eq!(table.len(), 1);
//! ```

pub mod accessor;
pub mod assert;
pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod filter;
pub mod portmode;
pub mod query;
pub mod records;
pub mod schema;
pub mod subintf;
pub mod summary;
pub mod table;
pub mod vlanlist;

pub use accessor::{MemoryAccessor, Scope, Snapshot, TableAccessor};
pub use assert::{
    AssertKind, AssertReason, AssertRequest, AssertResult, AssertionVerdict, MtuVerdict,
    PeerResolution, ResultFilter,
};
pub use config::{AssertConfig, EngineConfig, PortmodeConfig, QueryConfig};
pub use engine::InterfacesEngine;
pub use error::{NetlensError, NetlensResult};
pub use expr::Expr;
pub use filter::NameFilter;
pub use portmode::{BuiltinInterpreter, ConfigInterpreter, Switchports};
pub use query::InterfaceQuery;
pub use records::{
    DevConfigRecord, DeviceRecord, InterfaceKey, InterfaceRecord, LldpRecord, MlagRecord,
    VlanRecord,
};
pub use schema::{Columns, SchemaRegistry};
pub use summary::{NamespaceSummary, Stat};
pub use table::{Record, Table, Value};
