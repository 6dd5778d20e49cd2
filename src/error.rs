//! Error types for aurora-lint
//!
//! Errors are grouped by where they surface: configuration (before any tree
//! walk), rule lookup, style-sheet parsing, and value editing during a fix.

/// Configuration-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration syntax
    #[error("Invalid configuration syntax: {0}")]
    InvalidSyntax(String),

    /// Rule options do not have the expected shape
    #[error("Invalid option value for rule {rule}: {message}")]
    InvalidOption { rule: String, message: String },

    /// A pattern inside rule options failed to compile
    #[error("Invalid pattern for {field}: {message}")]
    InvalidPattern { field: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::InvalidSyntax(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidSyntax(err.to_string())
    }
}

/// Rule-related errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Invalid rule definition
    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),

    /// Rule not found
    #[error("Rule not found: {0}")]
    NotFound(String),
}

/// Style-sheet parse errors, positioned at the offending character (1-indexed)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unclosed block at {line}:{column}")]
    UnclosedBlock { line: u32, column: u32 },

    #[error("Unexpected }} at {line}:{column}")]
    UnexpectedClose { line: u32, column: u32 },

    #[error("Unclosed comment at {line}:{column}")]
    UnclosedComment { line: u32, column: u32 },

    #[error("Unclosed string at {line}:{column}")]
    UnclosedString { line: u32, column: u32 },

    #[error("Unknown word at {line}:{column}: expected a declaration")]
    MissingColon { line: u32, column: u32 },
}

/// Errors raised by the value edit buffer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Range {start}..{end} is outside of a value of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Range {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },

    #[error("Range {start}..{end} overlaps an earlier edit")]
    Overlap { start: usize, end: usize },
}

/// Top-level error type for aurora-lint
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Parse error in the style sheet
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}
