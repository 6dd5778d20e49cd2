//! Matchers built from magic-value configuration entries
//!
//! A matcher answers three questions about a declaration value: could it
//! contain the magic value at all (`test`), where exactly (`locate`), and what
//! should each occurrence become (`replace`). `test` is a cheap textual check;
//! `locate` parses the value and is only run when `test` passes.

use crate::color::Rgba;
use crate::config::{MatcherOptions, Syntax, UseDeclarations};
use crate::error::ConfigError;
use crate::value::{self, ParsedValue, ValueKind, ValueNode};
use regex::{NoExpand, Regex};
use std::ops::Range;
use std::sync::LazyLock;

/// Anything that looks like a color literal, used as a pre-filter only
static COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#[0-9a-f]{3,8}\b|rgba?\(.*?\)|hsla?\(.*?\)").unwrap()
});

/// A bare property name such as `font-weight`
static PROP_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z-]+$").unwrap());

/// A compiled magic-value entry
#[derive(Debug, Clone)]
pub struct Matcher {
    key: String,
    strategy: Strategy,
    prop: Option<PropFilter>,
    replacement: Option<String>,
    uses: UseDeclarations,
}

#[derive(Debug, Clone)]
enum Strategy {
    /// Literal text with word boundaries on its word-character edges
    Word(Regex),
    /// Any color literal equal in value to the key
    Color(Rgba),
    /// A comma-separated group equal to the key once unquoted
    FamilyName,
}

/// Which declarations a matcher looks at
#[derive(Debug, Clone)]
enum PropFilter {
    /// Case-insensitive equality with a bare property name
    Name(String),
    /// Case-insensitive regular expression over the property name
    Pattern(Regex),
}

impl PropFilter {
    fn new(pattern: &str) -> Result<Self, ConfigError> {
        if PROP_NAME_PATTERN.is_match(pattern) {
            return Ok(PropFilter::Name(pattern.to_string()));
        }
        Regex::new(&format!("(?i){pattern}"))
            .map(PropFilter::Pattern)
            .map_err(|e| ConfigError::InvalidPattern {
                field: format!("prop '{pattern}'"),
                message: e.to_string(),
            })
    }

    fn matches(&self, prop: &str) -> bool {
        match self {
            PropFilter::Name(name) => name.eq_ignore_ascii_case(prop),
            PropFilter::Pattern(regex) => regex.is_match(prop),
        }
    }
}

impl Matcher {
    /// Build a matcher for the magic value `key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `prop` is not a valid regular expression or a
    /// `<color>` key is not a color.
    pub fn new(key: &str, options: MatcherOptions) -> Result<Self, ConfigError> {
        let strategy = match options.syntax.unwrap_or_default() {
            Syntax::Color => Strategy::Color(Rgba::parse(key).ok_or_else(|| {
                ConfigError::InvalidPattern {
                    field: format!("magic value '{key}'"),
                    message: "not a hex, rgb() or hsl() color".to_string(),
                }
            })?),
            Syntax::FamilyName => Strategy::FamilyName,
            Syntax::Word => Strategy::Word(word_regex(key)?),
        };
        let prop = options.prop.as_deref().map(PropFilter::new).transpose()?;

        Ok(Self {
            key: key.to_string(),
            strategy,
            prop,
            replacement: options.replacement.filter(|r| !r.is_empty()),
            uses: options.uses.unwrap_or_default(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn replacement(&self) -> Option<&str> {
        self.replacement.as_deref()
    }

    /// Aliases the replacement needs imported
    pub fn uses(&self) -> &UseDeclarations {
        &self.uses
    }

    pub fn is_fixable(&self) -> bool {
        self.replacement.is_some()
    }

    /// Whether declarations of `prop` are checked at all
    pub fn applies_to(&self, prop: &str) -> bool {
        self.prop.as_ref().is_none_or(|filter| filter.matches(prop))
    }

    /// Fuzzy pre-check; may accept values that [`Matcher::locate`] rejects
    pub fn test(&self, value: &str) -> bool {
        match &self.strategy {
            Strategy::Word(regex) => regex.is_match(value),
            Strategy::Color(_) => COLOR_PATTERN.is_match(value),
            Strategy::FamilyName => value.contains(self.key.as_str()),
        }
    }

    /// Exact match ranges, ascending and non-overlapping
    ///
    /// Returns `None` when the whole value is the match.
    pub fn locate(&self, parsed: &ParsedValue) -> Option<Vec<Range<usize>>> {
        match &self.strategy {
            Strategy::Word(_) => None,
            Strategy::Color(reference) => Some(self.locate_colors(*reference, parsed)),
            Strategy::FamilyName => Some(self.locate_family_names(parsed)),
        }
    }

    /// Ranges of `value` holding the magic value; empty when there are none
    pub fn execute(&self, value: &str) -> Vec<Range<usize>> {
        if !self.test(value) {
            return Vec::new();
        }
        let parsed = ParsedValue::parse(value);
        self.locate(&parsed).unwrap_or_else(|| vec![0..value.len()])
    }

    /// What one matched part becomes, or `None` if this matcher only reports
    pub fn replace(&self, part: &str) -> Option<String> {
        let replacement = self.replacement.as_deref()?;
        Some(match &self.strategy {
            Strategy::Word(regex) => regex.replace_all(part, NoExpand(replacement)).into_owned(),
            Strategy::Color(_) | Strategy::FamilyName => replacement.to_string(),
        })
    }

    fn locate_colors(&self, reference: Rgba, parsed: &ParsedValue) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        parsed.walk(&mut |node| {
            if !is_color_node(node) {
                return true;
            }
            let source = node.stringify();
            if self.replacement.as_deref() == Some(source.as_str()) {
                return true;
            }
            if Rgba::parse(&source) == Some(reference) {
                ranges.push(node.range());
                return false;
            }
            true
        });
        ranges
    }

    fn locate_family_names(&self, parsed: &ParsedValue) -> Vec<Range<usize>> {
        value::split_on_div(&parsed.nodes, ",")
            .into_iter()
            .filter_map(|group| {
                let (first, last) = (group.first()?, group.last()?);
                let name = value::stringify_with(group, &unquote);
                (name == self.key).then(|| first.source_index..last.source_end_index)
            })
            .collect()
    }
}

/// A boundary is only meaningful next to a word character, so `::v-deep` is
/// not anchored at all while `bold` is anchored on both sides. Word characters
/// are ASCII on both sides of the check, so `ébold` still contains `bold`.
fn word_regex(key: &str) -> Result<Regex, ConfigError> {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let start = if key.starts_with(is_word) { r"(?-u:\b)" } else { "" };
    let end = if key.ends_with(is_word) { r"(?-u:\b)" } else { "" };
    Regex::new(&format!("(?i){start}{}{end}", regex::escape(key))).map_err(|e| {
        ConfigError::InvalidPattern {
            field: format!("magic value '{key}'"),
            message: e.to_string(),
        }
    })
}

fn is_color_node(node: &ValueNode) -> bool {
    match node.kind {
        ValueKind::Word => node.value.starts_with('#'),
        ValueKind::Function { .. } => {
            let name = node.value.to_ascii_lowercase();
            name.contains("rgb") || name.contains("hsl")
        }
        _ => false,
    }
}

fn unquote(node: &ValueNode) -> Option<String> {
    matches!(node.kind, ValueKind::String { .. }).then(|| node.value.clone())
}
