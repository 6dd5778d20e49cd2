//! Test utilities for aurora-lint integration tests

#![allow(dead_code)]

use aurora_lint::{LintConfig, LintEngine, LintOptions, LintResult, RuleSetting};
use pretty_assertions::assert_eq;
use serde_json::Value;

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub const MAGIC_VALUE: &str = "aurora/declaration-property-value-no-magic";
pub const COMBINATOR_POSITION: &str = "aurora/selector-nested-combinator-position";

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Extract Some value or panic with context
#[macro_export]
macro_rules! assert_some {
    ($expr:expr) => {
        match $expr {
            Some(v) => v,
            None => panic!("assertion failed: expected Some, got None"),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Some(v) => v,
            None => panic!("{}: got None", $msg),
        }
    };
}

/// An engine running a single rule
pub fn engine_with(rule: &str, primary: Value, secondary: Option<Value>) -> LintEngine {
    let setting = match secondary {
        Some(secondary) => RuleSetting::with_options(primary, secondary),
        None => RuleSetting::primary(primary),
    };
    let config = LintConfig::default().with_rule(rule, setting);
    match LintEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => panic!("failed to build engine for {rule}: {e}"),
    }
}

pub fn lint(engine: &LintEngine, code: &str, fix: bool) -> LintResult {
    match engine.lint(code, LintOptions { fix }) {
        Ok(result) => result,
        Err(e) => panic!("failed to lint {code:?}: {e}"),
    }
}

pub fn messages(result: &LintResult) -> Vec<String> {
    result.violations.iter().map(|v| v.message.clone()).collect()
}

/// `code` produces no violations and is left alone in fix mode
pub fn assert_accepts(engine: &LintEngine, code: &str) {
    let report = lint(engine, code, false);
    assert_eq!(messages(&report), Vec::<String>::new(), "reported {code:?}");
    assert_eq!(report.output, code);

    let fixed = lint(engine, code, true);
    assert_eq!(fixed.output, code, "rewrote {code:?}");
}

/// `code` produces exactly `message`, and fix mode turns it into `fixed`,
/// which is itself accepted
pub fn assert_rejects(engine: &LintEngine, code: &str, fixed: &str, message: &str) {
    let report = lint(engine, code, false);
    assert_eq!(messages(&report), vec![message.to_string()], "messages for {code:?}");
    assert_eq!(report.output, code);

    let result = lint(engine, code, true);
    assert_eq!(result.output, fixed);
    assert!(result.violations.is_empty(), "fix left {:?}", result.violations);

    assert_accepts(engine, fixed);
}
