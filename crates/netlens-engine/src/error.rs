//! Error types for engine operations.
//!
//! No-data conditions are not errors: they produce empty or all-fail
//! results. Errors are reserved for rejected requests (malformed filters,
//! columns or expressions) and for failures of the backing table store.

use std::io;
use thiserror::Error;

/// Result type alias for engine operations.
pub type NetlensResult<T> = Result<T, NetlensError>;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum NetlensError {
    /// A filter or match value supplied by the caller is malformed.
    #[error("Invalid value for filter {field}: {message}")]
    InvalidFilter {
        /// The filter name (e.g., "vlan", "matchval").
        field: String,
        /// Error message.
        message: String,
    },

    /// A requested column does not exist in the table schema.
    #[error("Unknown column '{column}' for table {table}")]
    InvalidColumn {
        /// The table name.
        table: String,
        /// The requested column.
        column: String,
    },

    /// The free-form query expression could not be parsed or refers to an
    /// unknown column.
    #[error("Invalid query expression '{expr}': {message}")]
    QueryExpr {
        /// The expression as given.
        expr: String,
        /// Error message.
        message: String,
    },

    /// The table accessor failed to produce records.
    #[error("Table access failed: {table}: {message}")]
    Accessor {
        /// The table name.
        table: String,
        /// Error message.
        message: String,
    },

    /// Engine configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure while loading a snapshot or configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot JSON could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetlensError {
    /// Creates an invalid filter error.
    pub fn invalid_filter(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown column error.
    pub fn invalid_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::InvalidColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a query expression error.
    pub fn query_expr(expr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QueryExpr {
            expr: expr.into(),
            message: message.into(),
        }
    }

    /// Creates a table access error.
    pub fn accessor(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Accessor {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error rejects the caller's request rather than
    /// reporting a failure of the data store or environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            NetlensError::InvalidFilter { .. }
                | NetlensError::InvalidColumn { .. }
                | NetlensError::QueryExpr { .. }
        )
    }
}
