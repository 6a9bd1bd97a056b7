//! Parsed configuration tree.

/// One configuration statement and the statements nested under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    /// Statement text with indentation, braces and terminators removed.
    pub text: String,

    /// Nested statements in source order.
    pub children: Vec<ConfigNode>,
}

impl ConfigNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Returns the first child whose text equals `text`.
    pub fn child(&self, text: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|c| c.text == text)
    }

    /// Iterates over children whose text starts with `prefix` followed by
    /// whitespace, yielding the child and the remainder after the prefix.
    pub fn children_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a ConfigNode, &'a str)> + 'a {
        self.children
            .iter()
            .filter_map(move |c| strip_keyword(&c.text, prefix).map(|rest| (c, rest)))
    }

    /// Returns the remainder of the first child statement starting with
    /// `prefix`, e.g. `value_of("switchport access vlan")` on an interface
    /// block yields `"10"`.
    pub fn value_of<'a>(&'a self, prefix: &'a str) -> Option<&'a str> {
        self.children_with_prefix(prefix).map(|(_, rest)| rest).next()
    }

    /// Returns true if a child statement equals `text`.
    pub fn has(&self, text: &str) -> bool {
        self.child(text).is_some()
    }
}

/// A parsed configuration: the top-level statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    pub roots: Vec<ConfigNode>,
}

impl ConfigTree {
    /// Returns the first top-level statement whose text equals `text`.
    pub fn root(&self, text: &str) -> Option<&ConfigNode> {
        self.roots.iter().find(|r| r.text == text)
    }

    /// Iterates over top-level statements starting with the keyword `prefix`.
    pub fn roots_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a ConfigNode, &'a str)> + 'a {
        self.roots
            .iter()
            .filter_map(move |r| strip_keyword(&r.text, prefix).map(|rest| (r, rest)))
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Strips `prefix` from `text` when it is followed by whitespace, returning
/// the trimmed remainder.
fn strip_keyword<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(prefix)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}
