//! Interface queries.

use crate::accessor::{Scope, TableAccessor};
use crate::engine::InterfacesEngine;
use crate::error::{NetlensError, NetlensResult};
use crate::expr::Expr;
use crate::filter::NameFilter;
use crate::records::InterfaceRecord;
use crate::schema::{Columns, INTERFACES};
use crate::table::{Record, Table};
use netlens_types::{OperState, PortMode, VlanId};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Internal version column, never part of a `*` projection.
const VERSION_FIELD: &str = "sqvers";

/// Numeric columns accepted by [`InterfacesEngine::top`].
pub const TOP_FIELDS: &[&str] = &["mtu", "speed", "numChanges", "timestamp"];

/// Filters and projection of an interface query.
///
/// String filters accept `~regex` terms and `!`-negated terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceQuery {
    pub namespace: Vec<String>,
    pub hostname: Vec<String>,
    pub ifname: Vec<String>,
    /// Interface types; `["all"]` disables the default internal-type filter.
    pub types: Vec<String>,
    pub state: Option<String>,
    pub vrf: Vec<String>,
    pub master: Vec<String>,
    /// VLAN ids matched against the pvid and the VLAN list.
    pub vlan: Vec<String>,
    pub portmode: Option<String>,
    pub columns: Columns,
    pub query_expr: Option<String>,
    pub addnl_fields: Vec<String>,
}

fn strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl InterfaceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.namespace = strings(values);
        self
    }

    pub fn hostname<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.hostname = strings(values);
        self
    }

    pub fn ifname<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.ifname = strings(values);
        self
    }

    pub fn types<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.types = strings(values);
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn vrf<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.vrf = strings(values);
        self
    }

    pub fn master<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.master = strings(values);
        self
    }

    pub fn vlan<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.vlan = strings(values);
        self
    }

    pub fn portmode(mut self, portmode: impl Into<String>) -> Self {
        self.portmode = Some(portmode.into());
        self
    }

    pub fn columns(mut self, columns: Columns) -> Self {
        self.columns = columns;
        self
    }

    pub fn query_expr(mut self, expr: impl Into<String>) -> Self {
        self.query_expr = Some(expr.into());
        self
    }

    pub fn addnl_fields<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.addnl_fields = strings(values);
        self
    }

    /// The namespace/hostname scope of this query.
    pub fn scope(&self) -> NetlensResult<Scope> {
        Scope::new(&self.namespace, &self.hostname)
    }
}

/// Validated, compiled form of an [`InterfaceQuery`].
#[derive(Debug)]
struct CompiledQuery {
    scope: Scope,
    ifname: NameFilter,
    types: NameFilter,
    state: NameFilter,
    master: NameFilter,
    vlans: BTreeSet<u16>,
    portmode: Option<PortMode>,
    expr: Option<Expr>,
    need_portmode: bool,
    need_vlanlist: bool,
}

fn parse_state(state: &str) -> NetlensResult<()> {
    let bare = state.strip_prefix('!').unwrap_or(state);
    bare.parse::<OperState>()
        .map(|_| ())
        .map_err(|e| NetlensError::invalid_filter("state", e.to_string()))
}

impl CompiledQuery {
    fn compile(query: &InterfaceQuery, internal_types: &[String]) -> NetlensResult<Self> {
        let types = if query.types.iter().any(|t| t == "all") {
            NameFilter::default()
        } else if !query.types.is_empty() {
            NameFilter::new("type", &query.types)?
        } else if query.ifname.is_empty() {
            let hidden: Vec<String> = internal_types.iter().map(|t| format!("!{}", t)).collect();
            NameFilter::new("type", &hidden)?
        } else {
            NameFilter::default()
        };

        let state = match query.state.as_deref().filter(|s| !s.is_empty() && *s != "all") {
            Some(state) => {
                parse_state(state)?;
                NameFilter::new("state", &[state])?
            }
            None => NameFilter::default(),
        };

        let masters: Vec<&String> = query.master.iter().chain(&query.vrf).collect();

        let vlans = query
            .vlan
            .iter()
            .map(|v| {
                v.parse::<VlanId>()
                    .map(|id| id.as_u16())
                    .map_err(|e| NetlensError::invalid_filter("vlan", e.to_string()))
            })
            .collect::<NetlensResult<BTreeSet<u16>>>()?;

        let portmode = query
            .portmode
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<PortMode>()
                    .map_err(|e| NetlensError::invalid_filter("portmode", e.to_string()))
            })
            .transpose()?;

        let expr = match query.query_expr.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                let expr = Expr::parse(text)?;
                if let Some(bad) = expr.columns().into_iter().find(|c| !INTERFACES.has_field(c)) {
                    return Err(NetlensError::query_expr(
                        text,
                        format!("unknown column '{}'", bad),
                    ));
                }
                Some(expr)
            }
            _ => None,
        };

        let expr_uses = |column: &str| {
            expr.as_ref()
                .is_some_and(|e| e.columns().contains(&column))
        };
        let requested = |column: &str| {
            query.columns.requests(column) || query.addnl_fields.iter().any(|f| f == column)
        };
        let need_vlanlist = !vlans.is_empty() || requested("vlanList") || expr_uses("vlanList");
        let need_portmode =
            need_vlanlist || portmode.is_some() || requested("portmode") || expr_uses("portmode");

        Ok(Self {
            scope: query.scope()?,
            ifname: NameFilter::new("ifname", &query.ifname)?,
            types,
            state,
            master: NameFilter::new("master", &masters)?,
            vlans,
            portmode,
            expr,
            need_portmode,
            need_vlanlist,
        })
    }

    fn base_filter(&self, row: &InterfaceRecord) -> bool {
        self.ifname.matches(&row.ifname)
            && self.types.matches(row.if_type.as_str())
            && self.state.matches(row.state.as_str())
            && self.master.matches(&row.master)
    }

    fn vlan_filter(&self, row: &InterfaceRecord) -> bool {
        self.vlans.is_empty()
            || self.vlans.contains(&row.vlan)
            || row.vlan_list.iter().any(|v| self.vlans.contains(v))
    }
}

impl<A: TableAccessor> InterfacesEngine<A> {
    /// Returns the projected interface table for a query.
    ///
    /// No matching rows yields an empty table with the requested columns.
    #[instrument(skip(self))]
    pub fn get(&self, query: &InterfaceQuery) -> NetlensResult<Table> {
        let fields = self.resolve_fields(query)?;
        let rows = self.get_records(query)?;
        Ok(Table::from_records(&rows, &fields))
    }

    /// Returns the filtered, enriched interface records for a query.
    pub fn get_records(&self, query: &InterfaceQuery) -> NetlensResult<Vec<InterfaceRecord>> {
        let compiled = CompiledQuery::compile(query, &self.config.query.internal_types)?;

        let mut rows: Vec<InterfaceRecord> = self
            .accessor
            .interfaces(&compiled.scope)?
            .into_iter()
            .filter(|r| compiled.base_filter(r))
            .collect();
        debug!(rows = rows.len(), "fetched interfaces");

        if compiled.need_portmode {
            self.derive_portmode(&mut rows)?;
        }
        if compiled.need_vlanlist {
            self.derive_vlanlist(&mut rows)?;
        }

        if let Some(portmode) = compiled.portmode {
            rows.retain(|r| r.portmode == portmode);
        }
        rows.retain(|r| compiled.vlan_filter(r));
        if let Some(expr) = &compiled.expr {
            rows.retain(|r| expr.matches(r));
        }

        Ok(rows)
    }

    /// Resolves the output columns of a query.
    pub fn resolve_fields(&self, query: &InterfaceQuery) -> NetlensResult<Vec<String>> {
        let mut fields = self.schema.display_fields(INTERFACES.name, &query.columns)?;
        if query.columns == Columns::All {
            fields.retain(|f| f != VERSION_FIELD);
        }
        for extra in &query.addnl_fields {
            if !INTERFACES.has_field(extra) {
                return Err(NetlensError::invalid_column(INTERFACES.name, extra.as_str()));
            }
            if !fields.contains(extra) {
                fields.push(extra.clone());
            }
        }
        Ok(fields)
    }

    /// Returns the `count` interfaces with the largest values of a numeric
    /// column, or the smallest when `reverse` is set.
    #[instrument(skip(self, query))]
    pub fn top(
        &self,
        what: &str,
        count: usize,
        reverse: bool,
        query: &InterfaceQuery,
    ) -> NetlensResult<Table> {
        if !TOP_FIELDS.contains(&what) {
            return Err(NetlensError::invalid_filter(
                "what",
                format!("'{}' is not one of {}", what, TOP_FIELDS.join(", ")),
            ));
        }

        let mut fields = self.resolve_fields(query)?;
        if !fields.iter().any(|f| f == what) {
            fields.push(what.to_string());
        }

        let mut rows = self.get_records(query)?;
        let metric = |r: &InterfaceRecord| r.field(what).and_then(|v| v.as_i64()).unwrap_or(0);
        rows.sort_by(|a, b| {
            let ordering = metric(a).cmp(&metric(b));
            let ordering = if reverse { ordering } else { ordering.reverse() };
            ordering.then_with(|| a.key().cmp(&b.key()))
        });
        rows.truncate(count);

        Ok(Table::from_records(&rows, &fields))
    }
}
