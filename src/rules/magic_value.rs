#![forbid(unsafe_code)]

//! `aurora/declaration-property-value-no-magic`
//!
//! Reports configured "magic" values inside declaration values and, in fix
//! mode, replaces them with their configured replacement:
//!
//! ```toml
//! [rules."aurora/declaration-property-value-no-magic"]
//! bold = "bolder"
//! "#FF0000" = { syntax = "<color>", replacement = "foo.$red", uses = { foo = "@foo/theme" } }
//! ```
//!
//! Entries are checked in key order. Each declaration is matched against the
//! value as left by earlier entries, so one fix can hide a match from a later
//! entry.

mod matcher;
mod uses;

pub use matcher::Matcher;
pub use uses::ImportTable;

use crate::ast::{NodeId, Stylesheet};
use crate::config::options::{parse_option, parse_secondary};
use crate::config::{MagicValueOptions, MatcherConfig};
use crate::edit;
use crate::error::ConfigError;
use crate::rules::{ExecutionContext, Rule};
use crate::types::{RuleId, Severity};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

pub const RULE_NAME: &str = "declaration-property-value-no-magic";

/// Message reported for a magic value
pub fn rejected(matched: &str) -> String {
    format!("Unexpected magic value \"{matched}\"")
}

/// Rule that reports and replaces magic values
#[derive(Debug, Clone)]
pub struct MagicValueRule {
    rule_id: RuleId,
    severity: Severity,
    matchers: Vec<Matcher>,
}

impl MagicValueRule {
    pub fn new(matchers: Vec<Matcher>, severity: Severity) -> Self {
        Self {
            rule_id: RuleId::builtin(RULE_NAME),
            severity,
            matchers,
        }
    }

    /// Build the rule from its primary option (the magic-value table) and
    /// optional secondary options
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the table has the wrong shape, or any entry has
    /// an invalid property pattern or color.
    pub fn from_options(
        primary: Value,
        secondary: Option<Value>,
        default_severity: Severity,
    ) -> Result<Self, ConfigError> {
        let name = RuleId::builtin(RULE_NAME);
        let table: BTreeMap<String, MatcherConfig> =
            parse_option(name.as_str(), "magic values", primary)?;
        let options: MagicValueOptions = parse_secondary(name.as_str(), secondary)?;

        let matchers = table
            .into_iter()
            .filter(|(_, config)| config.is_enabled())
            .map(|(key, config)| Matcher::new(&key, config.into_options()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            matchers,
            options.severity.unwrap_or(default_severity),
        ))
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    fn check(
        &self,
        sheet: &mut Stylesheet,
        id: NodeId,
        matcher: &Matcher,
        imports: &mut ImportTable,
        ctx: &mut ExecutionContext,
    ) {
        let Some(node) = sheet.get(id) else {
            return;
        };
        let Some((prop, value)) = node.declaration_parts() else {
            return;
        };
        if !matcher.applies_to(prop) {
            return;
        }

        let ranges = matcher.execute(value);
        let Some(first) = ranges.first() else {
            trace!(prop, value, key = matcher.key(), "No magic value");
            return;
        };

        if !(ctx.fix && matcher.is_fixable()) {
            let matched = value.get(first.clone()).unwrap_or(value).to_string();
            ctx.report(self, node, rejected(&matched), matched);
            return;
        }

        let fixed = edit::replace_ranges(value, &ranges, |part| {
            matcher.replace(part).unwrap_or_else(|| part.to_string())
        });
        match fixed {
            Ok(fixed) => {
                debug!(prop, from = value, to = fixed.as_str(), "Replaced magic value");
                if let Some(node) = sheet.get_mut(id) {
                    node.set_value(fixed);
                }
                imports.ensure(sheet, matcher.uses());
            }
            Err(err) => {
                warn!(prop, value, key = matcher.key(), error = %err, "Skipping magic value fix");
            }
        }
    }
}

impl Rule for MagicValueRule {
    fn id(&self) -> &RuleId {
        &self.rule_id
    }

    fn description(&self) -> &str {
        "Disallow magic values in declaration values"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn fixable(&self) -> bool {
        true
    }

    fn execute(&self, sheet: &mut Stylesheet, ctx: &mut ExecutionContext) {
        if self.matchers.is_empty() {
            return;
        }
        let mut imports = ImportTable::scan(sheet);
        for id in sheet.walk_decls() {
            for matcher in &self.matchers {
                self.check(sheet, id, matcher, &mut imports, ctx);
            }
        }
    }
}
