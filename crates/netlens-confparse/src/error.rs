//! Error types for configuration parsing.

use thiserror::Error;

/// Result type alias for configuration parsing.
pub type ConfParseResult<T> = Result<T, ConfParseError>;

/// Errors raised while parsing device configuration text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfParseError {
    /// An indented statement appeared before any top-level statement.
    #[error("line {line}: indented statement without a parent")]
    OrphanIndent {
        /// 1-based line number.
        line: usize,
    },

    /// A closing brace without a matching opening brace.
    #[error("line {line}: unexpected closing brace")]
    UnexpectedClose {
        /// 1-based line number.
        line: usize,
    },

    /// Input ended with blocks still open.
    #[error("unbalanced braces: {open} block(s) not closed")]
    Unclosed {
        /// Number of blocks left open.
        open: usize,
    },

    /// Grammar name not recognized.
    #[error("unknown configuration grammar '{0}'")]
    UnknownGrammar(String),
}
