#![forbid(unsafe_code)]

//! Aurora lint: style-sheet rules that report and rewrite magic values and
//! trailing selector combinators
//!
//! ```
//! use aurora_lint::{LintConfig, LintEngine, LintOptions};
//!
//! let config = LintConfig::parse(r#"
//! [rules."aurora/declaration-property-value-no-magic"]
//! bold = "bolder"
//! "#).unwrap();
//!
//! let engine = LintEngine::from_config(&config).unwrap();
//! let result = engine.lint(".foo { font-weight: bold }", LintOptions::fix()).unwrap();
//! assert_eq!(result.output, ".foo { font-weight: bolder }");
//! ```

pub mod ast;
pub mod color;
pub mod config;
pub mod edit;
pub mod engine;
pub mod error;
pub mod rules;
pub mod types;
pub mod value;

// Re-export error types for convenient access
pub use error::{ConfigError, EditError, LintError, ParseError, RuleError};

// Re-export core domain types for convenient access
pub use ast::{NodeData, NodeId, NodeKind, Stylesheet};
pub use config::{LintConfig, RuleSetting};
pub use engine::{LintEngine, LintOptions, LintResult};
pub use rules::{ExecutionContext, Rule, RuleRegistry, Violation};
pub use types::{Position, RuleId, Severity, Span};
