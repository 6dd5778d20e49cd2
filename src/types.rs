#![forbid(unsafe_code)]

//! Core domain types for aurora-lint
//!
//! This module defines the small validated types shared by the tree, the rules,
//! and the reported violations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace prefixed to every rule name
pub const RULE_NAMESPACE: &str = "aurora";

/// Violation severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A validated rule identifier
///
/// Rule IDs must be non-empty and contain only alphanumeric characters, hyphens,
/// underscores, and `/` namespace separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new RuleId, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() || id.starts_with('/') || id.ends_with('/') {
            return None;
        }
        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/')
        {
            return None;
        }
        Some(RuleId(id))
    }

    /// Derives the namespaced id for a rule from its bare name
    ///
    /// `declaration-property-value-no-magic` becomes
    /// `aurora/declaration-property-value-no-magic`. A name that already carries
    /// the namespace is returned unchanged.
    pub fn namespaced(name: &str) -> Option<Self> {
        let bare = name
            .strip_prefix(RULE_NAMESPACE)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(name);
        RuleId::new(format!("{RULE_NAMESPACE}/{bare}"))
    }

    /// Id of a built-in rule, whose name is known to be valid
    pub(crate) fn builtin(name: &str) -> Self {
        RuleId(format!("{RULE_NAMESPACE}/{name}"))
    }

    /// Returns the rule ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part after the namespace separator
    pub fn short_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(&self.0, |(_, name)| name)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleId::new(value).ok_or_else(|| "Invalid rule ID".to_string())
    }
}

impl From<RuleId> for String {
    fn from(rule_id: RuleId) -> Self {
        rule_id.0
    }
}

/// A location in the style-sheet source
///
/// `line` and `column` are 1-indexed; `offset` is the byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

/// The source range a node was parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Line start offsets for converting byte offsets into line/column pairs
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    offsets: Vec<usize>,
}

impl LineIndex {
    /// Each element is the byte offset of the start of a line; line 0 starts at 0.
    pub(crate) fn new(content: &str) -> Self {
        let mut offsets = vec![0];
        for (i, c) in content.char_indices() {
            if c == '\n' {
                offsets.push(i + 1);
            }
        }
        Self { offsets }
    }

    /// Convert a byte offset to a 1-indexed position
    pub(crate) fn position(&self, offset: usize) -> Position {
        let line_idx = self
            .offsets
            .partition_point(|&o| o <= offset)
            .saturating_sub(1);

        Position {
            line: (line_idx + 1) as u32,
            column: (offset - self.offsets[line_idx] + 1) as u32,
            offset,
        }
    }

    pub(crate) fn span(&self, start: usize, end: usize) -> Span {
        Span {
            start: self.position(start),
            end: self.position(end),
        }
    }
}
