//! Device configuration parsing for switchport role extraction.
//!
//! Raw per-device configuration text is parsed into a [`ConfigTree`] under
//! one of two grammars:
//!
//! - [`Grammar::Ios`]: indentation-structured text (IOS, NX-OS, EOS, and the
//!   ifupdown2 style Cumulus configuration)
//! - [`Grammar::Junos`]: brace-structured text (JunOS, PanOS)
//!
//! The tree is then queried for access and trunk switchports:
//!
//! ```
//! use netlens_confparse::{extract_access_ports, parse_config, Grammar};
//!
//! let text = "interface Ethernet1\n switchport mode access\n switchport access vlan 10\n";
//! let tree = parse_config(text, Grammar::Ios).unwrap();
//! let access = extract_access_ports(&tree, "eos");
//! assert_eq!(access.get("Ethernet1"), Some(&10));
//! ```

mod error;
mod grammar;
mod ports;
mod tree;

pub use error::{ConfParseError, ConfParseResult};
pub use grammar::{parse_config, Grammar};
pub use ports::{extract_access_ports, extract_trunk_ports, parse_vlan_ranges};
pub use tree::{ConfigNode, ConfigTree};
