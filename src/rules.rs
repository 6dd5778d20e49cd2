#![forbid(unsafe_code)]

//! Rule definitions and registry

pub mod combinator_position;
pub mod magic_value;
mod registry;
mod rule;

// Re-export core types
pub use combinator_position::CombinatorPositionRule;
pub use magic_value::{ImportTable, MagicValueRule, Matcher};
pub use registry::{RuleRegistry, builtin_rule_names};
pub use rule::{ExecutionContext, Rule, Violation};
