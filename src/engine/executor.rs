#![forbid(unsafe_code)]

//! Lint engine that runs the configured rules over style sheets
//!
//! Each style sheet is parsed, handed to every rule in registry order, and
//! printed back. Independent style sheets can be linted in parallel using
//! rayon; rules build their per-sheet state (such as import tables) fresh on
//! every run, so nothing is shared between sheets.

use crate::ast::Stylesheet;
use crate::config::LintConfig;
use crate::error::{ConfigError, LintError};
use crate::rules::{ExecutionContext, RuleRegistry, Violation};
use crate::types::Severity;
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Per-run switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LintOptions {
    /// Rewrite fixable problems instead of reporting them
    pub fix: bool,
}

impl LintOptions {
    pub fn report() -> Self {
        Self { fix: false }
    }

    pub fn fix() -> Self {
        Self { fix: true }
    }
}

/// Result of linting one style sheet
#[derive(Debug, Clone, PartialEq)]
pub struct LintResult {
    /// Problems left in the style sheet, in rule order
    pub violations: Vec<Violation>,
    /// Option errors of rules that did not run
    pub invalid_options: Vec<ConfigError>,
    /// The style sheet after fixes; identical to the input in report mode
    pub output: String,
}

impl LintResult {
    /// No violations and every configured rule ran
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.invalid_options.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.invalid_options.is_empty()
            || self.violations.iter().any(|v| v.severity == Severity::Error)
    }
}

/// Lint engine holding a validated set of rules
pub struct LintEngine {
    registry: RuleRegistry,
}

impl LintEngine {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// Build the rules named in `config`
    ///
    /// # Errors
    ///
    /// Returns `LintError::Rule` if the configuration names an unknown rule.
    /// Rules with invalid options are skipped and reported in every
    /// [`LintResult::invalid_options`] instead.
    pub fn from_config(config: &LintConfig) -> Result<Self, LintError> {
        Ok(Self::new(RuleRegistry::from_config(config)?))
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Parse, lint and print one style sheet
    ///
    /// # Errors
    ///
    /// Returns `LintError::Parse` if the source is not a well-formed style
    /// sheet.
    #[instrument(skip_all, fields(bytes = source.len(), fix = options.fix))]
    pub fn lint(&self, source: &str, options: LintOptions) -> Result<LintResult, LintError> {
        let mut sheet = Stylesheet::parse(source)?;
        let violations = self.lint_stylesheet(&mut sheet, options);
        Ok(LintResult {
            violations,
            invalid_options: self.registry.invalid_options().to_vec(),
            output: sheet.to_css(),
        })
    }

    /// Run every rule against a tree owned by the caller
    pub fn lint_stylesheet(&self, sheet: &mut Stylesheet, options: LintOptions) -> Vec<Violation> {
        let mut ctx = ExecutionContext::new(options.fix);
        for rule in self.registry.iter_rules() {
            let before = ctx.violations().len();
            rule.execute(sheet, &mut ctx);
            debug!(
                rule = %rule.id(),
                violations = ctx.violations().len() - before,
                "Rule finished"
            );
        }
        ctx.into_violations()
    }

    /// Lint independent style sheets in parallel
    ///
    /// Results are returned in input order; a parse error in one source does
    /// not affect the others.
    #[instrument(skip_all, fields(sources = sources.len(), fix = options.fix))]
    pub fn lint_batch<S>(&self, sources: &[S], options: LintOptions) -> Vec<Result<LintResult, LintError>>
    where
        S: AsRef<str> + Sync,
    {
        sources
            .par_iter()
            .map(|source| self.lint(source.as_ref(), options))
            .collect()
    }
}
