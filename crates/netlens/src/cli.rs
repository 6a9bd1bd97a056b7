//! Command line definition.

use clap::{Args, Parser, Subcommand, ValueEnum};
use netlens_engine::{AssertKind, AssertRequest, Columns, InterfaceQuery, ResultFilter};
use std::path::PathBuf;

/// Interface analytics over collected network state
#[derive(Parser, Debug)]
#[command(name = "netlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Snapshot of the collected tables (JSON)
    #[arg(short = 's', long, default_value = "snapshot.json")]
    pub snapshot: PathBuf,

    /// Engine configuration (TOML); defaults apply when the file is absent
    #[arg(short = 'c', long, default_value = "netlens.toml")]
    pub config: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(short = 'l', long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interface table operations
    #[command(subcommand)]
    Interface(InterfaceCommand),
}

#[derive(Subcommand, Debug)]
pub enum InterfaceCommand {
    /// Show interfaces matching the filters
    Show(FilterArgs),
    /// Run an interface assertion
    Assert(AssertArgs),
    /// Per-namespace rollup
    Summarize(FilterArgs),
    /// Interfaces with the largest (or smallest) values of a column
    Top(TopArgs),
}

/// Filters shared by every interface operation.
///
/// List filters take several values; prefix a value with `~` for a regular
/// expression or `!` to exclude it.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    #[arg(long, num_args = 1..)]
    pub namespace: Vec<String>,

    #[arg(long, num_args = 1..)]
    pub hostname: Vec<String>,

    #[arg(long, num_args = 1..)]
    pub ifname: Vec<String>,

    /// Interface types, or "all" to include internal ones
    #[arg(long = "type", num_args = 1..)]
    pub types: Vec<String>,

    /// Operational state, optionally negated with `!`
    #[arg(long)]
    pub state: Option<String>,

    #[arg(long, num_args = 1..)]
    pub vrf: Vec<String>,

    #[arg(long, num_args = 1..)]
    pub master: Vec<String>,

    /// VLAN ids matched against pvid or VLAN list
    #[arg(long, num_args = 1..)]
    pub vlan: Vec<String>,

    /// access, trunk, routed or unknown
    #[arg(long)]
    pub portmode: Option<String>,

    /// Row predicate, e.g. "mtu < 9000 and state == 'up'"
    #[arg(long = "query-str")]
    pub query_str: Option<String>,

    /// Output columns: "default", "*" or explicit names
    #[arg(long, num_args = 1..)]
    pub columns: Vec<String>,

    /// Columns appended to the output
    #[arg(long = "addnl-fields", num_args = 1..)]
    pub addnl_fields: Vec<String>,
}

impl FilterArgs {
    pub fn to_query(&self) -> InterfaceQuery {
        let mut query = InterfaceQuery::new()
            .namespace(self.namespace.iter().cloned())
            .hostname(self.hostname.iter().cloned())
            .ifname(self.ifname.iter().cloned())
            .types(self.types.iter().cloned())
            .vrf(self.vrf.iter().cloned())
            .master(self.master.iter().cloned())
            .vlan(self.vlan.iter().cloned())
            .addnl_fields(self.addnl_fields.iter().cloned())
            .columns(Columns::from_names(&self.columns));
        if let Some(state) = &self.state {
            query = query.state(state.as_str());
        }
        if let Some(portmode) = &self.portmode {
            query = query.portmode(portmode.as_str());
        }
        if let Some(expr) = &self.query_str {
            query = query.query_expr(expr.as_str());
        }
        query
    }
}

#[derive(Args, Debug, Clone)]
pub struct AssertArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// peering or mtu-value
    #[arg(long, default_value = "peering")]
    pub what: AssertKind,

    /// all, pass or fail
    #[arg(long, default_value = "all")]
    pub result: ResultFilter,

    /// Do not fail interfaces whose first problem is a missing peer
    #[arg(long)]
    pub ignore_missing_peer: bool,

    /// Allowed MTU values for mtu-value
    #[arg(long, num_args = 1..)]
    pub matchval: Vec<String>,
}

impl AssertArgs {
    pub fn to_request(&self) -> AssertRequest {
        AssertRequest {
            what: self.what,
            result: self.result,
            ignore_missing_peer: self.ignore_missing_peer,
            matchval: self.matchval.clone(),
            query: self.filters.to_query(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TopArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// mtu, speed, numChanges or timestamp
    #[arg(long, default_value = "numChanges")]
    pub what: String,

    #[arg(long, default_value_t = 5)]
    pub count: usize,

    /// Smallest values first
    #[arg(long)]
    pub reverse: bool,
}
