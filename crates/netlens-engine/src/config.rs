//! Engine configuration.
//!
//! Loaded from a TOML file; every field has a default so a partial (or
//! missing) file yields a working configuration.

use crate::error::{NetlensError, NetlensResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Query engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Interface types hidden unless the caller asks for type "all" or
    /// filters by name or type explicitly
    #[serde(default = "default_internal_types")]
    pub internal_types: Vec<String>,
}

/// Assertion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertConfig {
    /// Interface types checked by the peering assertion when the caller
    /// gives no type filter
    #[serde(default = "default_assert_types")]
    pub default_types: Vec<String>,

    /// Operational state filter applied when the caller gives none
    #[serde(default = "default_assert_state")]
    pub default_state: String,

    /// Interface names excluded from MTU value assertions
    #[serde(default = "default_loopback_ifnames")]
    pub loopback_ifnames: Vec<String>,
}

/// Portmode derivation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortmodeConfig {
    /// OS name fragments whose configuration uses the brace grammar
    #[serde(default = "default_junos_os_families")]
    pub junos_os_families: Vec<String>,

    /// Text markers that select the brace grammar when the OS is unknown
    #[serde(default = "default_junos_markers")]
    pub junos_markers: Vec<String>,

    /// Name of the software bridge pseudo-interface
    #[serde(default = "default_bridge_ifname")]
    pub bridge_ifname: String,
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default, rename = "assert")]
    pub assertion: AssertConfig,

    #[serde(default)]
    pub portmode: PortmodeConfig,
}

fn default_internal_types() -> Vec<String> {
    vec!["internal".to_string()]
}

fn default_assert_types() -> Vec<String> {
    ["ethernet", "bond_slave", "subinterface", "vlan", "bond"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_assert_state() -> String {
    "up".to_string()
}

fn default_loopback_ifnames() -> Vec<String> {
    vec!["lo".to_string()]
}

fn default_junos_os_families() -> Vec<String> {
    vec!["junos".to_string(), "panos".to_string()]
}

fn default_junos_markers() -> Vec<String> {
    vec!["\ninterfaces {\n".to_string(), "paloaltonetworks".to_string()]
}

fn default_bridge_ifname() -> String {
    "bridge".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            internal_types: default_internal_types(),
        }
    }
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            default_types: default_assert_types(),
            default_state: default_assert_state(),
            loopback_ifnames: default_loopback_ifnames(),
        }
    }
}

impl Default for PortmodeConfig {
    fn default() -> Self {
        Self {
            junos_os_families: default_junos_os_families(),
            junos_markers: default_junos_markers(),
            bridge_ifname: default_bridge_ifname(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> NetlensResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).map_err(|e| {
                NetlensError::Config(format!("Failed to parse {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(NetlensError::Io(e)),
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> NetlensResult<Self> {
        toml::from_str(content).map_err(|e| NetlensError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> NetlensResult<()> {
        if self.assertion.default_types.is_empty() {
            return Err(NetlensError::Config(
                "assert.default_types must not be empty".to_string(),
            ));
        }

        if self.assertion.default_state.is_empty() {
            return Err(NetlensError::Config(
                "assert.default_state must not be empty".to_string(),
            ));
        }

        if self.portmode.junos_os_families.is_empty() {
            return Err(NetlensError::Config(
                "portmode.junos_os_families must not be empty".to_string(),
            ));
        }

        if self.portmode.bridge_ifname.is_empty() {
            return Err(NetlensError::Config(
                "portmode.bridge_ifname must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
