//! Module imports (`@use`) at the top of a style sheet
//!
//! Replacements such as `foo.$color` only work when the module behind `foo`
//! is imported. [`ImportTable`] reads the existing `@use` directives once per
//! run and inserts the missing ones ahead of the first other statement.

use crate::ast::{NodeData, NodeId, Stylesheet};
use crate::config::UseDeclarations;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// `'source'` or `"source"`, optionally followed by `as alias`
static USE_PARAMS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:'([^']+)'|"([^"]+)")(?:\s*as\s*(\S+))?\s*$"#).unwrap()
});

/// Imports of one style sheet, keyed by local alias
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    uses: UseDeclarations,
    /// New imports go before this node; `None` appends to the root
    anchor: Option<NodeId>,
}

impl ImportTable {
    /// Read the root-level `@use` directives of `sheet`
    pub fn scan(sheet: &Stylesheet) -> Self {
        let children = sheet.children(sheet.root());
        let is_use = |id: NodeId| sheet.get(id).is_some_and(|node| node.is_at_rule_named("use"));

        let mut uses = UseDeclarations::new();
        for node in children.iter().filter(|&&id| is_use(id)).filter_map(|&id| sheet.get(id)) {
            if let Some((alias, source)) = node.params().and_then(parse_use_params) {
                uses.insert(alias, source);
            }
        }

        let anchor = if children.iter().any(|&id| is_use(id)) {
            children.iter().find(|&&id| !is_use(id)).copied()
        } else {
            children.first().copied()
        };

        Self { uses, anchor }
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.uses.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }

    /// Entries of `required` that are absent or bound to another source
    pub fn missing<'a>(&self, required: &'a UseDeclarations) -> Vec<(&'a str, &'a str)> {
        required
            .iter()
            .filter(|(alias, source)| self.get(alias) != Some(source.as_str()))
            .map(|(alias, source)| (alias.as_str(), source.as_str()))
            .collect()
    }

    /// Insert every missing import of `required` and record it
    ///
    /// Returns how many directives were inserted.
    pub fn ensure(&mut self, sheet: &mut Stylesheet, required: &UseDeclarations) -> usize {
        let missing = self.missing(required);
        for &(alias, source) in &missing {
            self.insert(sheet, alias, source);
        }
        missing.len()
    }

    fn insert(&mut self, sheet: &mut Stylesheet, alias: &str, source: &str) {
        let node = NodeData::at_rule("use", format!("'{source}' as {alias}"));
        let anchor = self.anchor.filter(|id| sheet.contains(*id));

        match anchor {
            Some(anchor) if sheet.index_of(anchor) == Some(0) => {
                // The new directive becomes the first statement; the old first
                // statement moves onto its own line.
                if let Some(first) = sheet.get_mut(anchor)
                    && !first.raws.before.contains('\n')
                {
                    first.raws.before = format!("\n{}", first.raws.before.trim_start());
                }
                sheet.insert_before(anchor, node);
            }
            Some(anchor) => {
                let before = sheet
                    .get(anchor)
                    .map(|n| n.raws.before.clone())
                    .filter(|b| b.contains('\n'))
                    .unwrap_or_else(|| "\n".to_string());
                sheet.insert_before(anchor, node.with_before(before));
            }
            None => {
                let root = sheet.root();
                let before = if sheet.children(root).is_empty() { "" } else { "\n" };
                sheet.append(root, node.with_before(before));
            }
        }

        debug!(alias, source, "Inserted @use directive");
        self.uses.insert(alias.to_string(), source.to_string());
    }
}

/// Parse `@use` params into `(local alias, source)`
fn parse_use_params(params: &str) -> Option<(String, String)> {
    let captures = USE_PARAMS_PATTERN.captures(params)?;
    let source = captures.get(1).or_else(|| captures.get(2))?.as_str();
    let alias = match captures.get(3) {
        Some(alias) => alias.as_str().to_string(),
        None => partial_name(source),
    };
    Some((alias, source.to_string()))
}

/// `../theme/_colors.scss` is imported as `colors`
fn partial_name(source: &str) -> String {
    let stem = Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    stem.trim_start_matches('_').to_string()
}
