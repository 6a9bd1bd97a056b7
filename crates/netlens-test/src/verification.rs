//! Verification helpers for engine results
//!
//! Provides assertion helpers over peering verdicts and projected tables

use netlens_engine::{AssertResult, AssertionVerdict, Table, Value};
use thiserror::Error;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("No verdict for {hostname}:{ifname}")]
    VerdictNotFound { hostname: String, ifname: String },

    #[error("Unexpected verdict for {hostname}:{ifname}")]
    UnexpectedVerdict { hostname: String, ifname: String },

    #[error("Result mismatch for {hostname}:{ifname}: expected '{expected}', got '{actual}'")]
    ResultMismatch {
        hostname: String,
        ifname: String,
        expected: AssertResult,
        actual: AssertResult,
    },

    #[error("Reason mismatch for {hostname}:{ifname}: expected {expected:?}, got {actual:?}")]
    ReasonMismatch {
        hostname: String,
        ifname: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Expected {expected} rows, found {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Column '{column}' not found in table")]
    ColumnNotFound { column: String },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Peering verdict verification helper
pub struct VerdictVerifier<'a> {
    verdicts: &'a [AssertionVerdict],
}

impl<'a> VerdictVerifier<'a> {
    pub fn new(verdicts: &'a [AssertionVerdict]) -> Self {
        Self { verdicts }
    }

    /// Look up the verdict of one interface
    pub fn find(&self, hostname: &str, ifname: &str) -> VerifyResult<&'a AssertionVerdict> {
        self.verdicts
            .iter()
            .find(|v| v.hostname == hostname && v.ifname == ifname)
            .ok_or_else(|| VerificationError::VerdictNotFound {
                hostname: hostname.to_string(),
                ifname: ifname.to_string(),
            })
    }

    /// Verify that an interface has no verdict at all
    pub fn assert_absent(&self, hostname: &str, ifname: &str) -> VerifyResult<()> {
        if self.find(hostname, ifname).is_ok() {
            return Err(VerificationError::UnexpectedVerdict {
                hostname: hostname.to_string(),
                ifname: ifname.to_string(),
            });
        }
        Ok(())
    }

    /// Verify the result of one interface
    pub fn assert_result(&self, hostname: &str, ifname: &str, expected: AssertResult) -> VerifyResult<()> {
        let verdict = self.find(hostname, ifname)?;
        if verdict.result != expected {
            return Err(VerificationError::ResultMismatch {
                hostname: hostname.to_string(),
                ifname: ifname.to_string(),
                expected,
                actual: verdict.result,
            });
        }
        Ok(())
    }

    /// Verify the exact, ordered reason list of one interface
    pub fn assert_reasons(&self, hostname: &str, ifname: &str, expected: &[&str]) -> VerifyResult<()> {
        let verdict = self.find(hostname, ifname)?;
        let actual = verdict.reasons();
        if actual != expected {
            return Err(VerificationError::ReasonMismatch {
                hostname: hostname.to_string(),
                ifname: ifname.to_string(),
                expected: expected.iter().map(|s| s.to_string()).collect(),
                actual: actual.iter().map(|s| s.to_string()).collect(),
            });
        }
        Ok(())
    }

    /// Verify a clean pass: result pass with no reasons
    pub fn assert_pass(&self, hostname: &str, ifname: &str) -> VerifyResult<()> {
        self.assert_result(hostname, ifname, AssertResult::Pass)?;
        self.assert_reasons(hostname, ifname, &[])
    }

    /// Verify a failure with the exact reason list
    pub fn assert_fail(&self, hostname: &str, ifname: &str, reasons: &[&str]) -> VerifyResult<()> {
        self.assert_result(hostname, ifname, AssertResult::Fail)?;
        self.assert_reasons(hostname, ifname, reasons)
    }

    pub fn assert_count(&self, expected: usize) -> VerifyResult<()> {
        if self.verdicts.len() != expected {
            return Err(VerificationError::CountMismatch {
                expected,
                actual: self.verdicts.len(),
            });
        }
        Ok(())
    }
}

/// Values of one column, rendered as strings
pub fn column_strings(table: &Table, column: &str) -> VerifyResult<Vec<String>> {
    if table.column_index(column).is_none() {
        return Err(VerificationError::ColumnNotFound {
            column: column.to_string(),
        });
    }
    Ok(table.column_values(column).map(Value::to_string).collect())
}

/// Verify the number of rows of a table
pub fn assert_row_count(table: &Table, expected: usize) -> VerifyResult<()> {
    if table.len() != expected {
        return Err(VerificationError::CountMismatch {
            expected,
            actual: table.len(),
        });
    }
    Ok(())
}
