//! Table schemas and column selection.

use crate::error::{NetlensError, NetlensResult};
use std::collections::HashMap;

/// Column selection requested by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Columns {
    /// The table's display columns.
    #[default]
    Default,
    /// Every schema column.
    All,
    /// An explicit column list.
    List(Vec<String>),
}

impl Columns {
    /// Builds a column selection from command-line style input:
    /// `["default"]`, `["*"]` or explicit names.
    pub fn from_names(names: &[String]) -> Self {
        match names {
            [] => Columns::Default,
            [one] if one == "default" => Columns::Default,
            [one] if one == "*" => Columns::All,
            _ => Columns::List(names.to_vec()),
        }
    }

    /// Returns true if the selection explicitly names `column` or selects
    /// every column.
    pub fn requests(&self, column: &str) -> bool {
        match self {
            Columns::Default => false,
            Columns::All => true,
            Columns::List(names) => names.iter().any(|n| n == column),
        }
    }
}

/// One column of a table schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Position among the display columns, `None` if not displayed by
    /// default.
    pub display: Option<u8>,
}

const fn field(name: &'static str, display: Option<u8>) -> FieldSpec {
    FieldSpec { name, display }
}

/// Schema of one table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl TableSchema {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// All field names in schema order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.to_string()).collect()
    }

    /// Display field names in display order.
    pub fn display_names(&self) -> Vec<String> {
        let mut shown: Vec<&FieldSpec> = self.fields.iter().filter(|f| f.display.is_some()).collect();
        shown.sort_by_key(|f| f.display);
        shown.into_iter().map(|f| f.name.to_string()).collect()
    }
}

pub const INTERFACES: TableSchema = TableSchema {
    name: "interfaces",
    fields: &[
        field("namespace", Some(0)),
        field("hostname", Some(1)),
        field("ifname", Some(2)),
        field("state", Some(3)),
        field("adminState", Some(4)),
        field("type", Some(5)),
        field("mtu", Some(6)),
        field("speed", None),
        field("master", Some(8)),
        field("portmode", None),
        field("vlan", Some(7)),
        field("vlanList", None),
        field("ipAddressList", Some(9)),
        field("ip6AddressList", Some(10)),
        field("description", None),
        field("reason", None),
        field("numChanges", None),
        field("macaddr", None),
        field("timestamp", Some(11)),
        field("sqvers", None),
    ],
};

pub const LLDP: TableSchema = TableSchema {
    name: "lldp",
    fields: &[
        field("namespace", Some(0)),
        field("hostname", Some(1)),
        field("ifname", Some(2)),
        field("peerHostname", Some(3)),
        field("peerIfname", Some(4)),
        field("timestamp", Some(5)),
    ],
};

pub const MLAG: TableSchema = TableSchema {
    name: "mlag",
    fields: &[
        field("namespace", Some(0)),
        field("hostname", Some(1)),
        field("peerLink", Some(2)),
        field("timestamp", Some(3)),
    ],
};

pub const VLAN: TableSchema = TableSchema {
    name: "vlan",
    fields: &[
        field("namespace", Some(0)),
        field("hostname", Some(1)),
        field("vlan", Some(2)),
        field("vlanName", Some(3)),
        field("interfaces", Some(4)),
        field("timestamp", Some(5)),
    ],
};

pub const DEVCONFIG: TableSchema = TableSchema {
    name: "devconfig",
    fields: &[
        field("namespace", Some(0)),
        field("hostname", Some(1)),
        field("config", None),
        field("timestamp", Some(2)),
    ],
};

pub const DEVICE: TableSchema = TableSchema {
    name: "device",
    fields: &[
        field("namespace", Some(0)),
        field("hostname", Some(1)),
        field("os", Some(2)),
        field("vendor", Some(3)),
        field("status", Some(4)),
        field("timestamp", Some(5)),
    ],
};

/// Per-table schema metadata.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    tables: HashMap<&'static str, TableSchema>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        let tables = [INTERFACES, LLDP, MLAG, VLAN, DEVCONFIG, DEVICE]
            .into_iter()
            .map(|t| (t.name, t))
            .collect();
        Self { tables }
    }
}

impl SchemaRegistry {
    pub fn table(&self, name: &str) -> NetlensResult<&TableSchema> {
        self.tables
            .get(name)
            .ok_or_else(|| NetlensError::accessor(name, "no schema for table"))
    }

    /// Resolves a column selection into the concrete field list to project.
    pub fn display_fields(&self, table: &str, columns: &Columns) -> NetlensResult<Vec<String>> {
        let schema = self.table(table)?;
        match columns {
            Columns::Default => Ok(schema.display_names()),
            Columns::All => Ok(schema.field_names()),
            Columns::List(names) => {
                if let Some(bad) = names.iter().find(|n| !schema.has_field(n)) {
                    return Err(NetlensError::invalid_column(table, bad.as_str()));
                }
                Ok(names.clone())
            }
        }
    }
}
