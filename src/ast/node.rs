//! Node payloads stored in the style-sheet arena

use crate::types::Span;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node inside a [`Stylesheet`](super::Stylesheet).
    pub struct NodeId;
}

/// What a node is, along with its textual payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Rule {
        selector: String,
    },
    Declaration {
        prop: String,
        value: String,
        important: bool,
    },
    AtRule {
        name: String,
        params: String,
        /// Whether the at-rule has a `{ ... }` body
        block: bool,
    },
    Comment {
        text: String,
        /// `// text` rather than `/* text */`
        inline: bool,
    },
}

/// Source whitespace kept around a node so it prints back unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raws {
    /// Whitespace before the node
    pub before: String,
    /// Rule: selector to `{`. Declaration: prop to value, colon included.
    /// At-rule: params to `{` or `;`.
    pub between: String,
    /// Containers: whitespace before `}` (root: trailing text).
    /// Declaration: value to `;`.
    pub after: String,
    /// At-rule: name to params
    pub after_name: String,
    /// Declaration: the raw ` !important` suffix
    pub important: String,
    /// Declaration or body-less at-rule was terminated by `;`
    pub semicolon: bool,
}

/// A node in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub raws: Raws,
    /// Where the node was parsed from; `None` for nodes created by a fix
    pub span: Option<Span>,
}

impl NodeData {
    pub(crate) fn root() -> Self {
        Self {
            kind: NodeKind::Root,
            raws: Raws::default(),
            span: None,
        }
    }

    /// A fresh rule with an empty body
    pub fn rule(selector: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Rule {
                selector: selector.into(),
            },
            raws: Raws {
                between: " ".to_string(),
                ..Raws::default()
            },
            span: None,
        }
    }

    /// A fresh `prop: value;` declaration
    pub fn declaration(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Declaration {
                prop: prop.into(),
                value: value.into(),
                important: false,
            },
            raws: Raws {
                between: ": ".to_string(),
                semicolon: true,
                ..Raws::default()
            },
            span: None,
        }
    }

    /// A fresh body-less at-rule, e.g. `@use 'theme' as t;`
    pub fn at_rule(name: impl Into<String>, params: impl Into<String>) -> Self {
        let params = params.into();
        let after_name = if params.is_empty() { "" } else { " " };
        Self {
            kind: NodeKind::AtRule {
                name: name.into(),
                params,
                block: false,
            },
            raws: Raws {
                after_name: after_name.to_string(),
                semicolon: true,
                ..Raws::default()
            },
            span: None,
        }
    }

    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.raws.before = before.into();
        self
    }

    /// Whether the node can hold children
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Root | NodeKind::Rule { .. } | NodeKind::AtRule { block: true, .. }
        )
    }

    pub fn is_rule(&self) -> bool {
        matches!(self.kind, NodeKind::Rule { .. })
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self.kind, NodeKind::Declaration { .. })
    }

    /// Whether this is an at-rule with the given name (case-insensitive)
    pub fn is_at_rule_named(&self, wanted: &str) -> bool {
        matches!(&self.kind, NodeKind::AtRule { name, .. } if name.eq_ignore_ascii_case(wanted))
    }

    pub fn selector(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Rule { selector } => Some(selector),
            _ => None,
        }
    }

    pub fn set_selector(&mut self, new_selector: impl Into<String>) {
        if let NodeKind::Rule { selector } = &mut self.kind {
            *selector = new_selector.into();
        }
    }

    /// `(prop, value)` of a declaration
    pub fn declaration_parts(&self) -> Option<(&str, &str)> {
        match &self.kind {
            NodeKind::Declaration { prop, value, .. } => Some((prop, value)),
            _ => None,
        }
    }

    pub fn set_value(&mut self, new_value: impl Into<String>) {
        if let NodeKind::Declaration { value, .. } = &mut self.kind {
            *value = new_value.into();
        }
    }

    /// `params` of an at-rule
    pub fn params(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::AtRule { params, .. } => Some(params),
            _ => None,
        }
    }
}
