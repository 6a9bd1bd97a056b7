//! Name filters for string columns.
//!
//! Each filter value is one of:
//!
//! - `name`: exact match
//! - `~pattern`: regular expression, anchored at both ends
//! - `!name` / `!~pattern`: excludes matching values
//!
//! A value passes when it matches any positive term (or there are none) and
//! matches no negative term. An empty filter passes everything.

use crate::error::{NetlensError, NetlensResult};
use regex::Regex;

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Pattern(Regex),
}

impl Matcher {
    fn parse(field: &str, term: &str) -> NetlensResult<Self> {
        match term.strip_prefix('~') {
            Some(pattern) => Regex::new(&format!("^(?:{})$", pattern))
                .map(Matcher::Pattern)
                .map_err(|e| NetlensError::invalid_filter(field, e.to_string())),
            None => Ok(Matcher::Exact(term.to_string())),
        }
    }

    fn is_match(&self, value: &str) -> bool {
        match self {
            Matcher::Exact(s) => s == value,
            Matcher::Pattern(re) => re.is_match(value),
        }
    }
}

/// A compiled include/exclude filter over a string column.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    include: Vec<Matcher>,
    exclude: Vec<Matcher>,
}

impl NameFilter {
    /// Compiles filter terms for the named field.
    ///
    /// # Errors
    ///
    /// Returns [`NetlensError::InvalidFilter`] if a `~` term is not a valid
    /// regular expression.
    pub fn new<S: AsRef<str>>(field: &str, terms: &[S]) -> NetlensResult<Self> {
        let mut filter = NameFilter::default();
        for term in terms.iter().map(AsRef::as_ref).filter(|t| !t.is_empty()) {
            match term.strip_prefix('!') {
                Some(negated) => filter.exclude.push(Matcher::parse(field, negated)?),
                None => filter.include.push(Matcher::parse(field, term)?),
            }
        }
        Ok(filter)
    }

    /// Builds an exact-match filter over the given values.
    pub fn exact<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NameFilter {
            include: values.into_iter().map(|v| Matcher::Exact(v.into())).collect(),
            exclude: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn matches(&self, value: &str) -> bool {
        (self.include.is_empty() || self.include.iter().any(|m| m.is_match(value)))
            && !self.exclude.iter().any(|m| m.is_match(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = NameFilter::new::<&str>("hostname", &[]).unwrap();
        assert!(filter.is_empty());
        assert!(filter.matches("anything"));
    }

    #[test]
    fn test_exact_and_regex() {
        let filter = NameFilter::new("hostname", &["spine01", "~leaf0[12]"]).unwrap();
        assert!(filter.matches("spine01"));
        assert!(filter.matches("leaf02"));
        assert!(!filter.matches("leaf03"));
        assert!(!filter.matches("xleaf01"));
    }

    #[test]
    fn test_negation() {
        let filter = NameFilter::new("type", &["!loopback", "!~vx.*"]).unwrap();
        assert!(filter.matches("ethernet"));
        assert!(!filter.matches("loopback"));
        assert!(!filter.matches("vxlan"));
    }

    #[test]
    fn test_bad_regex_is_caller_error() {
        let err = NameFilter::new("ifname", &["~swp[1"]).unwrap_err();
        assert!(err.is_caller_error());
    }
}
