//! Integration test infrastructure for the netlens engine
//!
//! Provides:
//! - Record builders for interfaces, LLDP, MLAG, VLAN and device tables
//! - A snapshot builder that wires links in both directions
//! - Verdict verification helpers

pub mod fixtures;
mod verification;

pub use fixtures::*;
pub use verification::*;

/// Routes engine logs to the test harness output.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. Honors `RUST_LOG`.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
