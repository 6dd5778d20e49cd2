//! Parsing for the lint configuration table
//!
//! The configuration maps rule names to settings, in TOML or JSON:
//!
//! ```toml
//! default_severity = "warning"
//!
//! [rules."aurora/declaration-property-value-no-magic"]
//! bold = "bolder"
//! "#FF0000" = { syntax = "<color>", replacement = "black" }
//!
//! [rules]
//! "aurora/selector-nested-combinator-position" = ["as-prefix", { includes = ["::v-deep"] }]
//! ```

use crate::error::ConfigError;
use crate::types::{RuleId, Severity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Severity for rules that do not set their own
    #[serde(default)]
    pub default_severity: Severity,

    /// Rule name to setting, run in name order
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,
}

impl LintConfig {
    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: LintConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: LintConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Enable a rule with a primary option, replacing any earlier setting
    pub fn with_rule(mut self, name: impl Into<String>, setting: RuleSetting) -> Self {
        self.rules.insert(name.into(), setting);
        self
    }

    /// Rule names must at least be valid identifiers; whether a rule with that
    /// name exists is decided by the registry.
    fn validate(&self) -> Result<(), ConfigError> {
        for name in self.rules.keys() {
            if RuleId::namespaced(name).is_none() {
                return Err(ConfigError::InvalidSyntax(format!(
                    "Invalid rule name '{name}'"
                )));
            }
        }
        Ok(())
    }
}

/// How a single rule is configured
///
/// `false` (or `null` in JSON) disables the rule. Anything else is the rule's
/// primary option, optionally paired with a table of secondary options as
/// `[primary, secondary]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// Simple boolean enable/disable
    Enabled(bool),
    /// `[primary, secondary]`
    WithOptions(Value, Value),
    /// Primary option only
    Primary(Value),
}

impl RuleSetting {
    pub fn primary(value: impl Into<Value>) -> Self {
        RuleSetting::Primary(value.into())
    }

    pub fn with_options(primary: impl Into<Value>, secondary: impl Into<Value>) -> Self {
        RuleSetting::WithOptions(primary.into(), secondary.into())
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            RuleSetting::Enabled(enabled) => *enabled,
            RuleSetting::WithOptions(primary, _) => !primary.is_null(),
            RuleSetting::Primary(primary) => !primary.is_null(),
        }
    }

    /// Split into `(primary, secondary)`, or `None` when the rule is disabled
    ///
    /// A one-element array is treated as a primary option with no secondary
    /// options, matching `["as-prefix"]` to `"as-prefix"`.
    pub fn options(&self) -> Option<(Value, Option<Value>)> {
        if !self.is_enabled() {
            return None;
        }
        match self {
            RuleSetting::Enabled(enabled) => Some((Value::Bool(*enabled), None)),
            RuleSetting::WithOptions(primary, secondary) => {
                Some((primary.clone(), Some(secondary.clone())))
            }
            RuleSetting::Primary(Value::Array(items)) if items.len() == 1 => {
                Some((items[0].clone(), None))
            }
            RuleSetting::Primary(primary) => Some((primary.clone(), None)),
        }
    }
}
