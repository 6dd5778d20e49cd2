//! Integration tests for configuration parsing
//!
//! This module contains integration tests that verify:
//! - Config loading from fixture files
//! - Rule settings in their boolean, primary and `[primary, secondary]` shapes
//! - Registry construction, including unknown rules and invalid options

use aurora_lint::config::{LintConfig, RuleSetting};
use aurora_lint::rules::{Rule, RuleRegistry, builtin_rule_names};
use aurora_lint::types::{RuleId, Severity};
use aurora_lint::{ConfigError, LintEngine, LintError, LintOptions, RuleError};
use serde_json::json;
use std::path::PathBuf;

// Helper to get fixture path
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("config")
        .join(filename)
}

fn load(filename: &str) -> Result<LintConfig, ConfigError> {
    let content = std::fs::read_to_string(fixture_path(filename)).unwrap();
    LintConfig::parse(&content)
}

fn rule_id(name: &str) -> RuleId {
    RuleId::namespaced(name).unwrap()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_config_load_valid_minimal() {
    let config = load("valid_minimal.toml").unwrap();

    assert_eq!(config.default_severity, Severity::Error);
    assert_eq!(config.rules.len(), 1);
    assert_eq!(
        config.rules["selector-nested-combinator-position"],
        RuleSetting::primary("as-prefix")
    );
}

#[test]
fn test_config_load_valid_full() {
    let config = load("valid_full.toml").unwrap();

    assert_eq!(config.default_severity, Severity::Warning);
    assert_eq!(config.rules.len(), 2);

    let combinator = &config.rules["aurora/selector-nested-combinator-position"];
    let (primary, secondary) = combinator.options().unwrap();
    assert_eq!(primary, json!("as-prefix"));
    assert_eq!(
        secondary,
        Some(json!({ "includes": ["::v-deep"], "severity": "error" }))
    );

    let magic = &config.rules["aurora/declaration-property-value-no-magic"];
    let (primary, secondary) = magic.options().unwrap();
    assert_eq!(primary["bold"], json!("bolder"));
    assert_eq!(primary["#FF0000"]["uses"]["theme"], json!("@acme/theme"));
    assert_eq!(secondary, None);
}

#[test]
fn test_config_load_invalid_syntax() {
    let result = load("invalid_syntax.toml");
    assert!(matches!(result, Err(ConfigError::InvalidSyntax(_))));
}

#[test]
fn test_config_load_unknown_field() {
    let err = load("invalid_unknown_field.toml").unwrap_err();
    assert!(err.to_string().contains("severity"), "{err}");
}

#[test]
fn test_config_load_invalid_rule_name() {
    let err = load("invalid_rule_name.toml").unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidSyntax("Invalid rule name 'no magic'".to_string())
    );
}

#[test]
fn test_config_from_json() {
    let config = LintConfig::from_json(
        r#"{
            "rules": {
                "aurora/selector-nested-combinator-position": ["as-prefix"],
                "aurora/declaration-property-value-no-magic": null
            }
        }"#,
    )
    .unwrap();

    let combinator = &config.rules["aurora/selector-nested-combinator-position"];
    assert_eq!(combinator.options(), Some((json!("as-prefix"), None)));

    let magic = &config.rules["aurora/declaration-property-value-no-magic"];
    assert!(!magic.is_enabled());
    assert_eq!(magic.options(), None);
}

// ============================================================================
// Registry construction
// ============================================================================

#[test]
fn test_registry_from_full_config() {
    let config = load("valid_full.toml").unwrap();
    let registry = RuleRegistry::from_config(&config).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.invalid_options().is_empty());

    let combinator = registry
        .get_rule(&rule_id("selector-nested-combinator-position"))
        .unwrap();
    assert_eq!(combinator.severity(), Severity::Error);
    assert!(combinator.fixable());

    let magic = registry
        .get_rule(&rule_id("declaration-property-value-no-magic"))
        .unwrap();
    assert_eq!(magic.severity(), Severity::Warning);
}

#[test]
fn test_registry_skips_disabled_rules() {
    let config = load("valid_disabled.toml").unwrap();
    let registry = RuleRegistry::from_config(&config).unwrap();

    let ids: Vec<String> = registry.iter_rules().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, vec!["aurora/declaration-property-value-no-magic"]);
}

#[test]
fn test_registry_rejects_unknown_rule() {
    let config = load("invalid_unknown_rule.toml").unwrap();

    let result = RuleRegistry::from_config(&config);
    assert!(matches!(result, Err(RuleError::NotFound(ref name)) if name == "aurora/no-important"));

    let result = LintEngine::from_config(&config);
    assert!(matches!(result, Err(LintError::Rule(_))));
}

#[test]
fn test_invalid_options_skip_only_that_rule() {
    let config = load("invalid_options.toml").unwrap();
    let engine = LintEngine::from_config(&config).unwrap();

    assert!(engine.registry().is_empty());
    let errors = engine.registry().invalid_options();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| matches!(e, ConfigError::InvalidPattern { .. })));
    assert!(errors.iter().any(|e| matches!(e, ConfigError::InvalidOption { .. })));

    let result = engine.lint(".foo > { color: #FF0000 }", LintOptions::fix()).unwrap();
    assert_eq!(result.output, ".foo > { color: #FF0000 }");
    assert!(result.violations.is_empty());
    assert!(!result.is_clean());
    assert!(result.has_errors());
}

#[test]
fn test_builtin_rule_names() {
    let names: Vec<String> = builtin_rule_names().map(|id| id.to_string()).collect();
    assert_eq!(
        names,
        vec![
            "aurora/declaration-property-value-no-magic",
            "aurora/selector-nested-combinator-position",
        ]
    );

    // Every built-in rule can be configured by its bare name
    for id in builtin_rule_names() {
        let config = LintConfig::default().with_rule(id.short_name(), RuleSetting::Enabled(true));
        assert!(RuleRegistry::from_config(&config).is_ok(), "{id}");
    }
}
