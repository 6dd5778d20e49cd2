#![forbid(unsafe_code)]

//! Core Rule trait and related types for defining and executing rules

use crate::ast::{NodeData, Stylesheet};
use crate::types::{RuleId, Severity, Span};
use std::fmt;

/// Execution context provided to rules when they execute
///
/// Carries the fix-mode flag in and the reported violations out.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    /// Rewrite the tree instead of reporting, where a rule knows how
    pub fix: bool,

    violations: Vec<Violation>,
}

impl ExecutionContext {
    pub fn new(fix: bool) -> Self {
        Self {
            fix,
            violations: Vec::new(),
        }
    }

    /// Report a violation against `node`
    pub fn report(
        &mut self,
        rule: &dyn Rule,
        node: &NodeData,
        message: String,
        snippet: impl Into<String>,
    ) {
        self.violations.push(Violation {
            rule_id: rule.id().clone(),
            severity: rule.severity(),
            message,
            snippet: snippet.into(),
            span: node.span,
        });
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// A single violation detected by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// ID of the rule that detected this violation
    pub rule_id: RuleId,

    pub severity: Severity,

    /// Human-readable message describing the violation
    pub message: String,

    /// The offending text: the matched value or the combinator
    pub snippet: String,

    /// Source range of the node the violation is anchored at
    pub span: Option<Span>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = self.span {
            write!(f, "{}:{} ", span.start.line, span.start.column)?;
        }
        write!(f, "{} ({})", self.message, self.rule_id)
    }
}

/// Trait that all rules must implement
///
/// The trait is `Send + Sync` so one registry can lint many style sheets in
/// parallel.
pub trait Rule: Send + Sync {
    /// Returns the unique identifier for this rule
    fn id(&self) -> &RuleId;

    /// Returns a human-readable description of what this rule checks
    fn description(&self) -> &str;

    /// Returns the severity level of violations from this rule
    fn severity(&self) -> Severity;

    /// Whether the rule can rewrite what it reports
    fn fixable(&self) -> bool;

    /// Executes the rule against a style sheet
    ///
    /// In fix mode the rule may mutate `sheet`; violations it cannot fix are
    /// still reported through `ctx`.
    fn execute(&self, sheet: &mut Stylesheet, ctx: &mut ExecutionContext);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    struct MockRule {
        rule_id: RuleId,
        severity: Severity,
    }

    impl Rule for MockRule {
        fn id(&self) -> &RuleId {
            &self.rule_id
        }

        fn description(&self) -> &str {
            "Reports every rule"
        }

        fn severity(&self) -> Severity {
            self.severity
        }

        fn fixable(&self) -> bool {
            false
        }

        fn execute(&self, sheet: &mut Stylesheet, ctx: &mut ExecutionContext) {
            for id in sheet.walk_rules() {
                if let Some(node) = sheet.get(id) {
                    let selector = node.selector().unwrap_or_default().to_string();
                    ctx.report(self, node, format!("Found {selector}"), selector);
                }
            }
        }
    }

    fn mock() -> MockRule {
        MockRule {
            rule_id: RuleId::namespaced("mock").unwrap(),
            severity: Severity::Warning,
        }
    }

    #[test]
    fn test_rule_trait_implementation() {
        let rule = mock();
        let mut sheet = Stylesheet::parse("a {}\nb {}").unwrap();
        let mut ctx = ExecutionContext::new(false);
        rule.execute(&mut sheet, &mut ctx);

        let violations = ctx.into_violations();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].rule_id.as_str(), "aurora/mock");
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[1].snippet, "b");
        assert_eq!(violations[1].span.unwrap().start.line, 2);
    }

    #[test]
    fn test_violation_display() {
        let at = Position {
            line: 3,
            column: 7,
            offset: 20,
        };
        let violation = Violation {
            rule_id: RuleId::namespaced("mock").unwrap(),
            severity: Severity::Error,
            message: "Unexpected magic value \"bold\"".to_string(),
            snippet: "bold".to_string(),
            span: Some(Span { start: at, end: at }),
        };
        assert_eq!(
            violation.to_string(),
            "3:7 Unexpected magic value \"bold\" (aurora/mock)"
        );

        let detached = Violation {
            span: None,
            ..violation
        };
        assert_eq!(
            detached.to_string(),
            "Unexpected magic value \"bold\" (aurora/mock)"
        );
    }

    #[test]
    fn test_rule_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Box<dyn Rule>>();
        assert_sync::<Box<dyn Rule>>();
    }
}
