//! Configuration grammars and the text-to-tree parsers behind them.

use crate::error::{ConfParseError, ConfParseResult};
use crate::tree::{ConfigNode, ConfigTree};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Configuration text grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    /// Indentation-structured text.
    Ios,
    /// Brace-structured text.
    Junos,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Ios => write!(f, "ios"),
            Grammar::Junos => write!(f, "junos"),
        }
    }
}

impl FromStr for Grammar {
    type Err = ConfParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ios" => Ok(Grammar::Ios),
            "junos" => Ok(Grammar::Junos),
            _ => Err(ConfParseError::UnknownGrammar(s.to_string())),
        }
    }
}

/// Parses configuration text into a tree under the given grammar.
///
/// # Errors
///
/// - [`ConfParseError::OrphanIndent`] for indented text with no parent
///   statement (ios grammar)
/// - [`ConfParseError::UnexpectedClose`] / [`ConfParseError::Unclosed`] for
///   unbalanced braces (junos grammar)
pub fn parse_config(text: &str, grammar: Grammar) -> ConfParseResult<ConfigTree> {
    let tree = match grammar {
        Grammar::Ios => parse_indented(text)?,
        Grammar::Junos => parse_braced(text)?,
    };
    debug!(%grammar, statements = tree.roots.len(), "parsed configuration");
    Ok(tree)
}

/// Attaches a completed node to the innermost open block, or to the roots.
fn attach(stack: &mut [(usize, ConfigNode)], roots: &mut Vec<ConfigNode>, node: ConfigNode) {
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn parse_indented(text: &str) -> ConfParseResult<ConfigTree> {
    let mut roots = Vec::new();
    // open blocks as (indent, node)
    let mut stack: Vec<(usize, ConfigNode)> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        let body = line.trim_start();
        if body.is_empty() || body.starts_with('!') || body.starts_with('#') {
            continue;
        }
        let indent = line.len() - body.len();

        while stack.last().is_some_and(|(top, _)| *top >= indent) {
            if let Some((_, node)) = stack.pop() {
                attach(&mut stack, &mut roots, node);
            }
        }

        if indent > 0 && stack.is_empty() && roots.is_empty() {
            return Err(ConfParseError::OrphanIndent { line: idx + 1 });
        }

        stack.push((indent, ConfigNode::new(body)));
    }

    while let Some((_, node)) = stack.pop() {
        attach(&mut stack, &mut roots, node);
    }

    Ok(ConfigTree { roots })
}

fn parse_braced(text: &str) -> ConfParseResult<ConfigTree> {
    let mut roots = Vec::new();
    let mut stack: Vec<(usize, ConfigNode)> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let body = raw.trim();
        if body.is_empty() || body.starts_with('#') || body.starts_with("/*") {
            continue;
        }
        // JunOS annotates deactivated statements; the statement still parses.
        let body = body.strip_prefix("inactive: ").unwrap_or(body);

        if body == "}" {
            let (_, node) = stack
                .pop()
                .ok_or(ConfParseError::UnexpectedClose { line: idx + 1 })?;
            attach(&mut stack, &mut roots, node);
        } else if let Some(head) = body.strip_suffix('{') {
            let depth = stack.len();
            stack.push((depth, ConfigNode::new(head.trim())));
        } else {
            let leaf = body.strip_suffix(';').unwrap_or(body).trim();
            attach(&mut stack, &mut roots, ConfigNode::new(leaf));
        }
    }

    if !stack.is_empty() {
        return Err(ConfParseError::Unclosed { open: stack.len() });
    }

    Ok(ConfigTree { roots })
}
