#![forbid(unsafe_code)]

//! Rule registry for building and holding the configured rules
//!
//! The RuleRegistry is responsible for:
//! - Mapping rule names in the configuration to built-in rule constructors
//! - Validating each rule's options before any style sheet is linted
//! - Keeping rules in a stable order for execution

use crate::config::{LintConfig, RuleSetting};
use crate::error::{ConfigError, RuleError};
use crate::rules::{CombinatorPositionRule, MagicValueRule, Rule, combinator_position, magic_value};
use crate::types::{RuleId, Severity};
use serde_json::Value;
use tracing::{debug, warn};

type RuleFactory = fn(Value, Option<Value>, Severity) -> Result<Box<dyn Rule>, ConfigError>;

/// Built-in rules by bare name
const BUILTIN_RULES: [(&str, RuleFactory); 2] = [
    (magic_value::RULE_NAME, build_magic_value),
    (combinator_position::RULE_NAME, build_combinator_position),
];

fn build_magic_value(
    primary: Value,
    secondary: Option<Value>,
    severity: Severity,
) -> Result<Box<dyn Rule>, ConfigError> {
    Ok(Box::new(MagicValueRule::from_options(primary, secondary, severity)?))
}

fn build_combinator_position(
    primary: Value,
    secondary: Option<Value>,
    severity: Severity,
) -> Result<Box<dyn Rule>, ConfigError> {
    Ok(Box::new(CombinatorPositionRule::from_options(primary, secondary, severity)?))
}

/// Names of every built-in rule, namespaced
pub fn builtin_rule_names() -> impl Iterator<Item = RuleId> {
    BUILTIN_RULES.iter().map(|(name, _)| RuleId::builtin(name))
}

/// Registry for storing and managing the enabled rules
///
/// Rules are stored as trait objects in the order they were added.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    invalid_options: Vec<ConfigError>,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every rule enabled in `config`
    ///
    /// A rule whose options fail validation is left out and its error recorded
    /// in [`RuleRegistry::invalid_options`]; the remaining rules still run.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::NotFound` if the configuration names a rule that
    /// does not exist.
    pub fn from_config(config: &LintConfig) -> Result<Self, RuleError> {
        let mut registry = Self::new();
        for (name, setting) in &config.rules {
            registry.configure(name, setting, config.default_severity)?;
        }
        Ok(registry)
    }

    fn configure(
        &mut self,
        name: &str,
        setting: &RuleSetting,
        default_severity: Severity,
    ) -> Result<(), RuleError> {
        let rule_id =
            RuleId::namespaced(name).ok_or_else(|| RuleError::NotFound(name.to_string()))?;
        let factory = BUILTIN_RULES
            .iter()
            .find(|(builtin, _)| RuleId::builtin(builtin) == rule_id)
            .map(|(_, factory)| *factory)
            .ok_or_else(|| RuleError::NotFound(rule_id.to_string()))?;

        let Some((primary, secondary)) = setting.options() else {
            debug!(rule = %rule_id, "Rule disabled");
            return Ok(());
        };

        match factory(primary, secondary, default_severity) {
            Ok(rule) => self.add(rule),
            Err(err) => {
                warn!(rule = %rule_id, error = %err, "Invalid rule options, rule skipped");
                self.invalid_options.push(err);
            }
        }
        Ok(())
    }

    /// Add a rule, replacing any rule with the same id in place
    pub fn add(&mut self, rule: Box<dyn Rule>) {
        match self.rules.iter().position(|r| r.id() == rule.id()) {
            Some(index) => self.rules[index] = rule,
            None => self.rules.push(rule),
        }
    }

    /// Get a rule by its ID
    ///
    /// Returns `None` if the rule is not found in the registry.
    pub fn get_rule(&self, id: &RuleId) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|rule| rule.id() == id)
            .map(|boxed| boxed.as_ref())
    }

    /// Iterate over all rules in execution order
    pub fn iter_rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|boxed| boxed.as_ref())
    }

    /// Option errors of rules that were left out
    pub fn invalid_options(&self) -> &[ConfigError] {
        &self.invalid_options
    }

    /// Get the number of rules in the registry
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombinatorExpectation;
    use serde_json::json;

    const MAGIC: &str = "aurora/declaration-property-value-no-magic";
    const COMBINATOR: &str = "aurora/selector-nested-combinator-position";

    fn id(name: &str) -> RuleId {
        RuleId::new(name).unwrap()
    }

    #[test]
    fn test_new_registry() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.invalid_options().is_empty());
    }

    #[test]
    fn test_builtin_rule_names() {
        let names: Vec<String> = builtin_rule_names().map(String::from).collect();
        assert_eq!(names, vec![MAGIC, COMBINATOR]);
    }

    #[test]
    fn test_from_config_builds_enabled_rules() {
        let config = LintConfig::default()
            .with_rule(MAGIC, RuleSetting::primary(json!({ "bold": "bolder" })))
            .with_rule(COMBINATOR, RuleSetting::primary("as-prefix"));

        let registry = RuleRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get_rule(&id(MAGIC)).is_some());
        assert!(registry.get_rule(&id(COMBINATOR)).is_some());
    }

    #[test]
    fn test_bare_names_are_namespaced() {
        let config = LintConfig::default().with_rule(
            "selector-nested-combinator-position",
            RuleSetting::primary("as-prefix"),
        );
        let registry = RuleRegistry::from_config(&config).unwrap();
        assert!(registry.get_rule(&id(COMBINATOR)).is_some());
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let config = LintConfig::default()
            .with_rule(MAGIC, RuleSetting::Enabled(false))
            .with_rule(COMBINATOR, RuleSetting::Primary(Value::Null));
        let registry = RuleRegistry::from_config(&config).unwrap();
        assert!(registry.is_empty());
        assert!(registry.invalid_options().is_empty());
    }

    #[test]
    fn test_foreign_namespace_is_unknown() {
        let config = LintConfig::default().with_rule(
            "other/selector-nested-combinator-position",
            RuleSetting::primary("as-prefix"),
        );
        assert!(matches!(
            RuleRegistry::from_config(&config),
            Err(RuleError::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_rule() {
        let config =
            LintConfig::default().with_rule("aurora/no-such-rule", RuleSetting::Enabled(true));
        let result = RuleRegistry::from_config(&config);
        assert!(matches!(result, Err(RuleError::NotFound(name)) if name == "aurora/no-such-rule"));
    }

    #[test]
    fn test_invalid_options_skip_only_that_rule() {
        let config = LintConfig::default()
            .with_rule(MAGIC, RuleSetting::primary(json!({ "bold": "bolder" })))
            .with_rule(COMBINATOR, RuleSetting::primary("invalid option"));

        let registry = RuleRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get_rule(&id(COMBINATOR)).is_none());
        assert_eq!(registry.invalid_options().len(), 1);
        assert!(matches!(
            &registry.invalid_options()[0],
            ConfigError::InvalidOption { rule, .. } if rule == COMBINATOR
        ));
    }

    #[test]
    fn test_default_severity_applies() {
        let config = LintConfig {
            default_severity: Severity::Warning,
            ..LintConfig::default()
        }
        .with_rule(COMBINATOR, RuleSetting::primary("as-prefix"));
        let registry = RuleRegistry::from_config(&config).unwrap();
        assert_eq!(
            registry.get_rule(&id(COMBINATOR)).unwrap().severity(),
            Severity::Warning
        );
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut registry = RuleRegistry::new();
        registry.add(Box::new(CombinatorPositionRule::new(
            CombinatorExpectation::AsPrefix,
            vec![],
            Severity::Error,
        )));
        registry.add(Box::new(CombinatorPositionRule::new(
            CombinatorExpectation::AsPrefix,
            vec!["::v-deep".to_string()],
            Severity::Info,
        )));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.iter_rules().next().unwrap().severity(), Severity::Info);
    }
}
