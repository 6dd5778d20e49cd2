#![forbid(unsafe_code)]

//! Lint execution engine

pub mod executor;

pub use executor::{LintEngine, LintOptions, LintResult};
