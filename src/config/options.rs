//! Option shapes accepted by the built-in rules
//!
//! Each rule validates its options once, when it is constructed. Anything that
//! does not fit one of these shapes is an [`ConfigError::InvalidOption`] and the
//! rule does not run at all.

use crate::error::ConfigError;
use crate::types::Severity;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Module alias to module source, e.g. `foo` to `'@foo/bar'`
pub type UseDeclarations = BTreeMap<String, String>;

/// One entry of the magic-value table: `true`, a replacement, or full options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatcherConfig {
    Toggle(bool),
    Replacement(String),
    Options(MatcherOptions),
}

impl MatcherConfig {
    /// `false` and `""` switch an entry off without removing it
    pub fn is_enabled(&self) -> bool {
        match self {
            MatcherConfig::Toggle(enabled) => *enabled,
            MatcherConfig::Replacement(replacement) => !replacement.is_empty(),
            MatcherConfig::Options(_) => true,
        }
    }

    /// Normalize every shape into [`MatcherOptions`]
    pub fn into_options(self) -> MatcherOptions {
        match self {
            MatcherConfig::Toggle(_) => MatcherOptions::default(),
            MatcherConfig::Replacement(replacement) => MatcherOptions {
                replacement: Some(replacement),
                ..MatcherOptions::default()
            },
            MatcherConfig::Options(options) => options,
        }
    }
}

/// Full options for one magic value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherOptions {
    /// Property filter: a bare property name, or a regular expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<Syntax>,

    /// Without a replacement the value is reported but never fixed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,

    /// Modules the replacement refers to, imported on fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<UseDeclarations>,
}

/// How a magic-value key is compared against declaration values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Syntax {
    /// `<color>`: compared by color value
    Color,
    /// `<family-name>`: compared against each comma-separated family
    FamilyName,
    /// Anything else: a literal word
    #[default]
    Word,
}

impl From<String> for Syntax {
    fn from(value: String) -> Self {
        match value.as_str() {
            "<color>" => Syntax::Color,
            "<family-name>" => Syntax::FamilyName,
            _ => Syntax::Word,
        }
    }
}

impl From<Syntax> for String {
    fn from(syntax: Syntax) -> Self {
        match syntax {
            Syntax::Color => "<color>".to_string(),
            Syntax::FamilyName => "<family-name>".to_string(),
            Syntax::Word => String::new(),
        }
    }
}

/// Secondary options of the magic-value rule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MagicValueOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// Where a trailing combinator is expected to go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinatorExpectation {
    #[serde(rename = "as-prefix")]
    AsPrefix,
}

/// Secondary options of the combinator-position rule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CombinatorOptions {
    /// Extra combinator tokens checked after `>`, `~` and `+`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// Deserialize a rule option, naming the rule in the error
pub(crate) fn parse_option<T: DeserializeOwned>(
    rule: &str,
    what: &str,
    value: Value,
) -> Result<T, ConfigError> {
    serde_json::from_value(value).map_err(|err| ConfigError::InvalidOption {
        rule: rule.to_string(),
        message: format!("{what}: {err}"),
    })
}

/// Deserialize optional secondary options, defaulting when absent
pub(crate) fn parse_secondary<T: DeserializeOwned + Default>(
    rule: &str,
    value: Option<Value>,
) -> Result<T, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => parse_option(rule, "secondary options", value),
    }
}
