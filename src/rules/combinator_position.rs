#![forbid(unsafe_code)]

//! `aurora/selector-nested-combinator-position`
//!
//! A nested rule whose parent selector ends in a combinator (`.foo > { .bar {} }`)
//! is reported; in fix mode the combinator moves onto each nested selector
//! (`.foo { > .bar {} }`).
//!
//! Combinators are checked in configured order and the first one the selector
//! ends with wins, so a token should be listed before any shorter token it
//! ends with.

use crate::ast::{NodeId, Stylesheet};
use crate::config::options::{parse_option, parse_secondary};
use crate::config::{CombinatorExpectation, CombinatorOptions};
use crate::error::ConfigError;
use crate::rules::{ExecutionContext, Rule};
use crate::types::{RuleId, Severity};
use serde_json::Value;
use tracing::debug;

pub const RULE_NAME: &str = "selector-nested-combinator-position";

/// Combinators checked before any configured `includes`
pub const DEFAULT_COMBINATORS: [&str; 3] = [">", "~", "+"];

/// Message reported for a trailing combinator
pub fn expected(combinator: &str) -> String {
    format!("Expected combinator \"{combinator}\" to be in the nested form")
}

/// Rule that moves trailing combinators onto nested selectors
#[derive(Debug, Clone)]
pub struct CombinatorPositionRule {
    rule_id: RuleId,
    severity: Severity,
    expectation: CombinatorExpectation,
    combinators: Vec<String>,
}

impl CombinatorPositionRule {
    /// A rule checking the default combinators followed by `includes`
    pub fn new(expectation: CombinatorExpectation, includes: Vec<String>, severity: Severity) -> Self {
        let combinators = DEFAULT_COMBINATORS
            .iter()
            .map(|c| c.to_string())
            .chain(includes)
            .collect();
        Self {
            rule_id: RuleId::builtin(RULE_NAME),
            severity,
            expectation,
            combinators,
        }
    }

    /// Build the rule from its primary option (`"as-prefix"`) and optional
    /// secondary options
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the expectation is not `"as-prefix"`, the
    /// secondary options have the wrong shape, or an included combinator is
    /// empty.
    pub fn from_options(
        primary: Value,
        secondary: Option<Value>,
        default_severity: Severity,
    ) -> Result<Self, ConfigError> {
        let name = RuleId::builtin(RULE_NAME);
        let expectation: CombinatorExpectation =
            parse_option(name.as_str(), "expectation", primary)?;
        let options: CombinatorOptions = parse_secondary(name.as_str(), secondary)?;

        let includes = options.includes.unwrap_or_default();
        if includes.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidOption {
                rule: name.to_string(),
                message: "includes: combinators must not be empty".to_string(),
            });
        }

        Ok(Self::new(
            expectation,
            includes,
            options.severity.unwrap_or(default_severity),
        ))
    }

    pub fn expectation(&self) -> CombinatorExpectation {
        self.expectation
    }

    pub fn combinators(&self) -> &[String] {
        &self.combinators
    }

    /// First configured combinator `selector` ends with
    pub fn detect(&self, selector: &str) -> Option<&str> {
        self.combinators
            .iter()
            .map(String::as_str)
            .find(|combinator| selector.ends_with(combinator))
    }

    fn relocate(&self, sheet: &mut Stylesheet, id: NodeId, selector: &str, combinator: &str) {
        let children = sheet.children(id).to_vec();
        for &child in &children {
            if let Some(node) = sheet.get_mut(child)
                && let Some(prefixed) = node.selector().map(|s| prefix_branches(s, combinator))
            {
                node.set_selector(prefixed);
            }
        }

        let remaining = selector[..selector.len() - combinator.len()].trim();
        if remaining.is_empty() || remaining == "&" {
            for &child in &children {
                sheet.move_before(id, child);
            }
            sheet.remove(id);
            debug!(selector, combinator, hoisted = children.len(), "Removed combinator wrapper");
        } else {
            if let Some(node) = sheet.get_mut(id) {
                node.set_selector(remaining);
            }
            debug!(selector, combinator, remaining, "Moved combinator into nested rules");
        }
    }
}

impl Rule for CombinatorPositionRule {
    fn id(&self) -> &RuleId {
        &self.rule_id
    }

    fn description(&self) -> &str {
        "Require combinators to prefix nested selectors instead of trailing the parent"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn fixable(&self) -> bool {
        true
    }

    fn execute(&self, sheet: &mut Stylesheet, ctx: &mut ExecutionContext) {
        for id in sheet.walk_rules() {
            let Some(node) = sheet.get(id) else {
                continue;
            };
            let Some(selector) = node.selector() else {
                continue;
            };
            let Some(combinator) = self.detect(selector) else {
                continue;
            };

            if ctx.fix {
                let selector = selector.to_string();
                self.relocate(sheet, id, &selector, combinator);
            } else {
                ctx.report(self, node, expected(combinator), combinator);
            }
        }
    }
}

/// Put `combinator` in front of every comma-separated branch, keeping each
/// branch's leading whitespace
fn prefix_branches(selector: &str, combinator: &str) -> String {
    selector
        .split(',')
        .map(|branch| match branch.find(|c: char| !c.is_whitespace()) {
            Some(at) => format!("{}{combinator} {}", &branch[..at], &branch[at..]),
            None => branch.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rule(secondary: Option<Value>) -> CombinatorPositionRule {
        CombinatorPositionRule::from_options(json!("as-prefix"), secondary, Severity::Error).unwrap()
    }

    fn fix(rule: &CombinatorPositionRule, source: &str) -> String {
        let mut sheet = Stylesheet::parse(source).unwrap();
        let mut ctx = ExecutionContext::new(true);
        rule.execute(&mut sheet, &mut ctx);
        assert!(ctx.violations().is_empty());
        sheet.to_css()
    }

    #[test]
    fn test_prefix_branches() {
        assert_eq!(prefix_branches(".bar", ">"), "> .bar");
        assert_eq!(prefix_branches(".a, .b", "~"), "~ .a, ~ .b");
        assert_eq!(prefix_branches(".a,\n  .b", "+"), "+ .a,\n  + .b");
        assert_eq!(prefix_branches(".a, ", ">"), "> .a, ");
    }

    #[test]
    fn test_detect_uses_configured_order() {
        let rule = rule(Some(json!({ "includes": ["::v-deep", "=>"] })));
        assert_eq!(rule.expectation(), CombinatorExpectation::AsPrefix);
        assert_eq!(rule.combinators(), [">", "~", "+", "::v-deep", "=>"]);
        assert_eq!(rule.detect(".foo ::v-deep"), Some("::v-deep"));
        assert_eq!(rule.detect(".foo =>"), Some(">"));
        assert_eq!(rule.detect(".foo > .bar"), None);
    }

    #[test]
    fn test_report_mode() {
        let rule = rule(None);
        let mut sheet = Stylesheet::parse(".foo > { .bar {} }\n.baz ~ {}").unwrap();
        let mut ctx = ExecutionContext::new(false);
        rule.execute(&mut sheet, &mut ctx);

        let messages: Vec<_> = ctx.violations().iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Expected combinator \">\" to be in the nested form",
                "Expected combinator \"~\" to be in the nested form",
            ]
        );
        assert_eq!(ctx.violations()[1].snippet, "~");
        assert_eq!(sheet.to_css(), ".foo > { .bar {} }\n.baz ~ {}");
    }

    #[test]
    fn test_fix_shrinks_parent_selector() {
        let rule = rule(None);
        assert_eq!(fix(&rule, ".foo > { .bar {} }"), ".foo { > .bar {} }");
        assert_eq!(
            fix(&rule, ".foo + { .a, .b { color: red } }"),
            ".foo { + .a, + .b { color: red } }"
        );
    }

    #[test]
    fn test_fix_hoists_empty_wrapper() {
        let rule = rule(None);
        assert_eq!(fix(&rule, ".foo { > { .bar {} } }"), ".foo { > .bar {} }");
        assert_eq!(fix(&rule, ".foo { & > { .bar {} } }"), ".foo { > .bar {} }");
    }

    #[test]
    fn test_fix_keeps_declarations_in_shrunk_rule() {
        let rule = rule(None);
        assert_eq!(
            fix(&rule, ".foo > { color: red; .bar {} }"),
            ".foo { color: red; > .bar {} }"
        );
    }

    #[test]
    fn test_fix_custom_combinator() {
        let rule = rule(Some(json!({ "includes": ["::v-deep"] })));
        assert_eq!(fix(&rule, ".foo ::v-deep { .bar {} }"), ".foo { ::v-deep .bar {} }");
    }

    #[test]
    fn test_fix_is_idempotent() {
        let rule = rule(None);
        let once = fix(&rule, ".foo > { .bar {} }");
        assert_eq!(fix(&rule, &once), once);
    }

    #[test]
    fn test_accepts_inline_combinators() {
        let rule = rule(None);
        for source in [".foo > .bar {}", ".foo { > .bar {} }", ".foo { & > .bar {} }"] {
            let mut sheet = Stylesheet::parse(source).unwrap();
            let mut ctx = ExecutionContext::new(false);
            rule.execute(&mut sheet, &mut ctx);
            assert!(ctx.violations().is_empty(), "{source}");
        }
    }

    #[test]
    fn test_invalid_options() {
        let result =
            CombinatorPositionRule::from_options(json!("invalid option"), None, Severity::Error);
        assert!(matches!(result, Err(ConfigError::InvalidOption { .. })));

        let result = CombinatorPositionRule::from_options(
            json!("as-prefix"),
            Some(json!({ "includes": [""] })),
            Severity::Error,
        );
        assert!(matches!(result, Err(ConfigError::InvalidOption { .. })));

        let result = CombinatorPositionRule::from_options(
            json!("as-prefix"),
            Some(json!({ "includes": "::v-deep" })),
            Severity::Error,
        );
        assert!(result.is_err());
    }
}
