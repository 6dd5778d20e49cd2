#![forbid(unsafe_code)]

//! Declaration value parsing
//!
//! Turns a raw value such as `1px solid rgb(255, 0, 0)` into a flat list of
//! words, strings, dividers and spaces, with function calls holding their
//! arguments as nested nodes. Every node records the byte range it came from
//! so matches can be located precisely inside the original value.
//!
//! Lexing is done with logos. Token priority follows logos rules:
//! 1. Longest match wins (`/* x */` as [`Token::Comment`] beats `/` as a divider)
//! 2. Words stop at whitespace, dividers, parentheses and quotes

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    #[regex(r"[ \t\n\r\f]+")]
    Space,

    #[token(",")]
    #[token("/")]
    #[token(":")]
    Div,

    #[token("(")]
    Open,

    #[token(")")]
    Close,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r#"'([^'\\]|\\.)*'"#)]
    Quoted,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[regex(r#"[^ \t\n\r\f,/:()"']+"#)]
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Token(Token),
    /// A quote with no closing partner; runs to the end of input
    UnclosedString,
    /// `/*` with no closing `*/`; runs to the end of input
    UnclosedComment,
}

/// What kind of value node this is, with any kind-specific raws
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Word,
    Space,
    String {
        quote: char,
        unclosed: bool,
    },
    /// `,`, `/` or `:` with the whitespace around it
    Div {
        before: String,
        after: String,
    },
    Comment {
        unclosed: bool,
    },
    /// `name(args)`; `value` holds the name, which may be empty for bare parentheses
    Function {
        before: String,
        after: String,
        nodes: Vec<ValueNode>,
        unclosed: bool,
    },
}

/// A node of a parsed value with its byte range in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNode {
    pub kind: ValueKind,
    pub value: String,
    pub source_index: usize,
    pub source_end_index: usize,
}

impl ValueNode {
    fn new(kind: ValueKind, value: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind,
            value: value.into(),
            source_index: span.start,
            source_end_index: span.end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.source_index..self.source_end_index
    }

    pub fn is_space(&self) -> bool {
        matches!(self.kind, ValueKind::Space)
    }

    pub fn is_word(&self) -> bool {
        matches!(self.kind, ValueKind::Word)
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ValueKind::Function { .. })
    }

    /// Whether this is a divider with the given character, e.g. `,`
    pub fn is_div(&self, div: &str) -> bool {
        matches!(self.kind, ValueKind::Div { .. }) && self.value == div
    }

    /// Arguments of a function node; empty for everything else
    pub fn nodes(&self) -> &[ValueNode] {
        match &self.kind {
            ValueKind::Function { nodes, .. } => nodes,
            _ => &[],
        }
    }

    /// Render the node exactly as it appeared in the source
    pub fn stringify(&self) -> String {
        stringify_with(std::slice::from_ref(self), &|_| None)
    }
}

/// A parsed declaration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedValue {
    pub nodes: Vec<ValueNode>,
}

impl ParsedValue {
    /// Parse a raw value. Parsing never fails: unbalanced parentheses, quotes
    /// and comments run to the end of the input and are flagged unclosed.
    pub fn parse(input: &str) -> Self {
        let lexemes = lex(input);
        let mut parser = ValueParser {
            input,
            lexemes,
            index: 0,
        };
        let (nodes, _) = parser.parse_nodes(false);
        Self { nodes }
    }

    /// Visit every node depth-first. Returning `false` from `visit` skips the
    /// node's arguments.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ValueNode) -> bool) {
        walk_nodes(&self.nodes, visit);
    }

    pub fn stringify(&self) -> String {
        stringify_with(&self.nodes, &|_| None)
    }
}

fn walk_nodes<'a>(nodes: &'a [ValueNode], visit: &mut impl FnMut(&'a ValueNode) -> bool) {
    for node in nodes {
        if visit(node) {
            walk_nodes(node.nodes(), visit);
        }
    }
}

/// Render nodes, letting `custom` replace the rendering of any node.
///
/// Returning `None` from `custom` keeps the default rendering, which for
/// functions recurses into the arguments with the same override.
pub fn stringify_with(nodes: &[ValueNode], custom: &dyn Fn(&ValueNode) -> Option<String>) -> String {
    let mut out = String::new();
    for node in nodes {
        if let Some(rendered) = custom(node) {
            out.push_str(&rendered);
            continue;
        }
        match &node.kind {
            ValueKind::Word | ValueKind::Space => out.push_str(&node.value),
            ValueKind::String { quote, unclosed } => {
                out.push(*quote);
                out.push_str(&node.value);
                if !unclosed {
                    out.push(*quote);
                }
            }
            ValueKind::Div { before, after } => {
                out.push_str(before);
                out.push_str(&node.value);
                out.push_str(after);
            }
            ValueKind::Comment { unclosed } => {
                out.push_str("/*");
                out.push_str(&node.value);
                if !unclosed {
                    out.push_str("*/");
                }
            }
            ValueKind::Function {
                before,
                after,
                nodes,
                unclosed,
            } => {
                out.push_str(&node.value);
                out.push('(');
                out.push_str(before);
                out.push_str(&stringify_with(nodes, custom));
                out.push_str(after);
                if !unclosed {
                    out.push(')');
                }
            }
        }
    }
    out
}

/// Split nodes into groups separated by dividers with the given character.
///
/// Spaces at the edges of each group are dropped; empty groups are kept so
/// callers can tell `a,,b` apart from `a,b`.
pub fn split_on_div<'a>(nodes: &'a [ValueNode], div: &str) -> Vec<&'a [ValueNode]> {
    nodes
        .split(|node| node.is_div(div))
        .map(trim_spaces)
        .collect()
}

fn trim_spaces(mut group: &[ValueNode]) -> &[ValueNode] {
    while let [first, rest @ ..] = group
        && first.is_space()
    {
        group = rest;
    }
    while let [rest @ .., last] = group
        && last.is_space()
    {
        group = rest;
    }
    group
}

fn lex(input: &str) -> Vec<(Lexeme, Range<usize>)> {
    let mut lexemes = Vec::new();
    let mut lexer = Token::lexer(input);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        if input[span.start..].starts_with("/*") && !matches!(result, Ok(Token::Comment)) {
            lexemes.push((Lexeme::UnclosedComment, span.start..input.len()));
            break;
        }
        match result {
            Ok(token) => lexemes.push((Lexeme::Token(token), span)),
            Err(()) if matches!(input.as_bytes()[span.start], b'"' | b'\'') => {
                lexemes.push((Lexeme::UnclosedString, span.start..input.len()));
                break;
            }
            Err(()) => lexemes.push((Lexeme::Token(Token::Word), span)),
        }
    }
    lexemes
}

struct ValueParser<'a> {
    input: &'a str,
    lexemes: Vec<(Lexeme, Range<usize>)>,
    index: usize,
}

impl ValueParser<'_> {
    /// Parse until the end of input or, when `nested`, the closing parenthesis.
    /// Returns the nodes and the end offset of the closing parenthesis if one
    /// was consumed.
    fn parse_nodes(&mut self, nested: bool) -> (Vec<ValueNode>, Option<usize>) {
        let input = self.input;
        let mut nodes = Vec::new();
        while let Some((lexeme, span)) = self.lexemes.get(self.index).cloned() {
            self.index += 1;
            let text = &input[span.clone()];
            match lexeme {
                Lexeme::UnclosedString => {
                    let quote = text.chars().next().unwrap_or('"');
                    let kind = ValueKind::String {
                        quote,
                        unclosed: true,
                    };
                    nodes.push(ValueNode::new(kind, &text[1..], span));
                }
                Lexeme::UnclosedComment => {
                    let kind = ValueKind::Comment { unclosed: true };
                    nodes.push(ValueNode::new(kind, &text[2..], span));
                }
                Lexeme::Token(Token::Space) => {
                    nodes.push(ValueNode::new(ValueKind::Space, text, span));
                }
                Lexeme::Token(Token::Div) => {
                    let kind = ValueKind::Div {
                        before: String::new(),
                        after: String::new(),
                    };
                    nodes.push(ValueNode::new(kind, text, span));
                }
                Lexeme::Token(Token::Quoted) => {
                    let quote = text.chars().next().unwrap_or('"');
                    let kind = ValueKind::String {
                        quote,
                        unclosed: false,
                    };
                    nodes.push(ValueNode::new(kind, &text[1..text.len() - 1], span));
                }
                Lexeme::Token(Token::Comment) => {
                    let kind = ValueKind::Comment { unclosed: false };
                    nodes.push(ValueNode::new(kind, &text[2..text.len() - 2], span));
                }
                Lexeme::Token(Token::Open) => {
                    nodes.push(self.parse_function(String::new(), span.start, span.end));
                }
                Lexeme::Token(Token::Close) if nested => {
                    return (absorb_div_spaces(nodes), Some(span.end));
                }
                Lexeme::Token(Token::Close) => {
                    nodes.push(ValueNode::new(ValueKind::Word, text, span));
                }
                Lexeme::Token(Token::Word) => {
                    let opens_call = matches!(
                        self.lexemes.get(self.index),
                        Some((Lexeme::Token(Token::Open), next)) if next.start == span.end
                    );
                    if opens_call {
                        let open_end = self.lexemes[self.index].1.end;
                        self.index += 1;
                        nodes.push(self.parse_function(text.to_string(), span.start, open_end));
                    } else {
                        nodes.push(ValueNode::new(ValueKind::Word, text, span));
                    }
                }
            }
        }
        (absorb_div_spaces(nodes), None)
    }

    fn parse_function(&mut self, name: String, start: usize, open_end: usize) -> ValueNode {
        if name.eq_ignore_ascii_case("url") && !self.next_is_quoted() {
            return self.parse_url(name, start, open_end);
        }

        let (mut args, close_end) = self.parse_nodes(true);
        let mut before = String::new();
        let mut after = String::new();
        if args.first().is_some_and(ValueNode::is_space) {
            before = args.remove(0).value;
        }
        if args.last().is_some_and(ValueNode::is_space) {
            after = args.pop().map(|node| node.value).unwrap_or_default();
        }

        let kind = ValueKind::Function {
            before,
            after,
            nodes: args,
            unclosed: close_end.is_none(),
        };
        let end = close_end.unwrap_or(self.input.len());
        ValueNode::new(kind, name, start..end)
    }

    /// `url(...)` with an unquoted argument keeps the argument as one word.
    fn parse_url(&mut self, name: String, start: usize, open_end: usize) -> ValueNode {
        let input = self.input;
        let close = input[open_end..].find(')').map(|i| open_end + i);
        let content_end = close.unwrap_or(input.len());
        let content = &input[open_end..content_end];
        let trimmed_start = content.trim_start();
        let word = trimmed_start.trim_end();
        let word_start = open_end + (content.len() - trimmed_start.len());

        let stop = close.map_or(input.len(), |c| c + 1);
        while self
            .lexemes
            .get(self.index)
            .is_some_and(|(_, span)| span.start < stop)
        {
            self.index += 1;
        }

        let mut nodes = Vec::new();
        if !word.is_empty() {
            nodes.push(ValueNode::new(
                ValueKind::Word,
                word,
                word_start..word_start + word.len(),
            ));
        }
        let kind = ValueKind::Function {
            before: content[..content.len() - trimmed_start.len()].to_string(),
            after: trimmed_start[word.len()..].to_string(),
            nodes,
            unclosed: close.is_none(),
        };
        ValueNode::new(kind, name, start..stop)
    }

    fn next_is_quoted(&self) -> bool {
        self.lexemes[self.index..]
            .iter()
            .find(|(lexeme, _)| *lexeme != Lexeme::Token(Token::Space))
            .is_some_and(|(lexeme, _)| {
                matches!(lexeme, Lexeme::Token(Token::Quoted) | Lexeme::UnclosedString)
            })
    }
}

/// Fold the spaces on either side of each divider into the divider itself.
fn absorb_div_spaces(nodes: Vec<ValueNode>) -> Vec<ValueNode> {
    let mut out: Vec<ValueNode> = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();
    while let Some(mut node) = iter.next() {
        if let ValueKind::Div { before, after } = &mut node.kind {
            if out.last().is_some_and(ValueNode::is_space)
                && let Some(space) = out.pop()
            {
                *before = space.value;
                node.source_index = space.source_index;
            }
            if iter.peek().is_some_and(ValueNode::is_space)
                && let Some(space) = iter.next()
            {
                *after = space.value;
                node.source_end_index = space.source_end_index;
            }
        }
        out.push(node);
    }
    out
}
