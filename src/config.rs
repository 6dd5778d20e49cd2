#![forbid(unsafe_code)]

//! Configuration parsing and rule option shapes

pub mod lint_config;
pub mod options;

pub use lint_config::{LintConfig, RuleSetting};
pub use options::{
    CombinatorExpectation, CombinatorOptions, MagicValueOptions, MatcherConfig, MatcherOptions,
    Syntax, UseDeclarations,
};
