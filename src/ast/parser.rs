//! Lossless parser for nested style sheets
//!
//! Recognizes rules, declarations, at-rules (with or without a body) and
//! comments at any nesting depth. Whitespace around every token is stored in
//! [`Raws`] so that printing reproduces the input byte for byte.

use super::node::{NodeData, NodeId, NodeKind, Raws};
use super::tree::Stylesheet;
use crate::error::ParseError;
use crate::types::LineIndex;

/// Parse style-sheet source into a [`Stylesheet`].
pub fn parse(source: &str) -> Result<Stylesheet, ParseError> {
    Parser::new(source).run()
}

/// Where a statement prelude stops
enum Terminator {
    Open(usize),
    Semicolon(usize),
    Close(usize),
    Eof,
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    lines: LineIndex,
    sheet: Stylesheet,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            lines: LineIndex::new(source),
            sheet: Stylesheet::new(),
        }
    }

    fn run(mut self) -> Result<Stylesheet, ParseError> {
        let root = self.sheet.root();
        self.parse_block(root, None)?;
        Ok(self.sheet)
    }

    /// Parse the children of `parent` up to its closing brace, or to the end
    /// of input for the root. `open` is the offset of the opening brace.
    fn parse_block(&mut self, parent: NodeId, open: Option<usize>) -> Result<(), ParseError> {
        loop {
            let before = self.take_trivia();
            let Some(&byte) = self.bytes.get(self.pos) else {
                return match open {
                    Some(offset) => {
                        let pos = self.lines.position(offset);
                        Err(ParseError::UnclosedBlock {
                            line: pos.line,
                            column: pos.column,
                        })
                    }
                    None => {
                        self.set_after(parent, before);
                        Ok(())
                    }
                };
            };

            match byte {
                b'}' => {
                    if open.is_none() {
                        let pos = self.lines.position(self.pos);
                        return Err(ParseError::UnexpectedClose {
                            line: pos.line,
                            column: pos.column,
                        });
                    }
                    self.set_after(parent, before);
                    self.pos += 1;
                    return Ok(());
                }
                b'/' if self.peek(1) == Some(b'*') => self.parse_comment(parent, before)?,
                b'/' if self.peek(1) == Some(b'/') => self.parse_line_comment(parent, before),
                b'@' => self.parse_at_rule(parent, before)?,
                _ => self.parse_statement(parent, before)?,
            }
        }
    }

    /// Consume whitespace and stray semicolons.
    fn take_trivia(&mut self) -> String {
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b';' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.source[start..self.pos].to_string()
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn parse_statement(&mut self, parent: NodeId, before: String) -> Result<(), ParseError> {
        let start = self.pos;
        match self.scan_prelude(start)? {
            Terminator::Open(brace) => self.parse_rule(parent, before, start, brace),
            Terminator::Semicolon(end) => self.parse_declaration(parent, before, start, end, true),
            Terminator::Close(end) => self.parse_declaration(parent, before, start, end, false),
            Terminator::Eof => {
                self.parse_declaration(parent, before, start, self.bytes.len(), false)
            }
        }
    }

    fn parse_rule(
        &mut self,
        parent: NodeId,
        before: String,
        start: usize,
        brace: usize,
    ) -> Result<(), ParseError> {
        let prelude = &self.source[start..brace];
        let selector = prelude.trim_end();
        let data = NodeData {
            kind: NodeKind::Rule {
                selector: selector.to_string(),
            },
            raws: Raws {
                before,
                between: prelude[selector.len()..].to_string(),
                ..Raws::default()
            },
            span: None,
        };
        let id = self.sheet.push_child(parent, data);
        self.pos = brace + 1;
        self.parse_block(id, Some(brace))?;
        self.set_span(id, start, self.pos);
        Ok(())
    }

    fn parse_declaration(
        &mut self,
        parent: NodeId,
        before: String,
        start: usize,
        end: usize,
        terminated: bool,
    ) -> Result<(), ParseError> {
        let text = &self.source[start..end];
        let Some(colon) = text.find(':') else {
            let pos = self.lines.position(start);
            return Err(ParseError::MissingColon {
                line: pos.line,
                column: pos.column,
            });
        };

        let prop = text[..colon].trim_end();
        let rest = &text[colon + 1..];
        let value_start = rest.len() - rest.trim_start().len();
        let raw_value = &rest[value_start..];
        let trimmed = raw_value.trim_end();
        let (value, important) = split_important(trimmed);

        let data = NodeData {
            kind: NodeKind::Declaration {
                prop: prop.to_string(),
                value: value.to_string(),
                important: !important.is_empty(),
            },
            raws: Raws {
                before,
                between: format!("{}:{}", &text[prop.len()..colon], &rest[..value_start]),
                after: if terminated {
                    raw_value[trimmed.len()..].to_string()
                } else {
                    String::new()
                },
                important: important.to_string(),
                semicolon: terminated,
                ..Raws::default()
            },
            span: None,
        };
        let id = self.sheet.push_child(parent, data);

        // Trailing whitespace of an unterminated declaration belongs to the
        // enclosing block.
        self.pos = if terminated {
            end + 1
        } else {
            start + colon + 1 + value_start + trimmed.len()
        };
        self.set_span(id, start, self.pos);
        Ok(())
    }

    fn parse_at_rule(&mut self, parent: NodeId, before: String) -> Result<(), ParseError> {
        let start = self.pos;
        let mut name_end = start + 1;
        while let Some(&b) = self.bytes.get(name_end) {
            if b.is_ascii_whitespace() || matches!(b, b'{' | b'}' | b';' | b'(' | b'"' | b'\'') {
                break;
            }
            name_end += 1;
        }
        let mut params_start = name_end;
        while self
            .bytes
            .get(params_start)
            .is_some_and(u8::is_ascii_whitespace)
        {
            params_start += 1;
        }

        let name = self.source[start + 1..name_end].to_string();
        let after_name = self.source[name_end..params_start].to_string();

        let (params_end, block, semicolon) = match self.scan_prelude(params_start)? {
            Terminator::Open(brace) => (brace, true, false),
            Terminator::Semicolon(end) => (end, false, true),
            Terminator::Close(end) => (end, false, false),
            Terminator::Eof => (self.bytes.len(), false, false),
        };
        let raw_params = &self.source[params_start..params_end];
        let params = raw_params.trim_end();
        let between = if block || semicolon {
            raw_params[params.len()..].to_string()
        } else {
            String::new()
        };

        let data = NodeData {
            kind: NodeKind::AtRule {
                name,
                params: params.to_string(),
                block,
            },
            raws: Raws {
                before,
                between,
                after_name,
                semicolon,
                ..Raws::default()
            },
            span: None,
        };
        let id = self.sheet.push_child(parent, data);

        if block {
            self.pos = params_end + 1;
            self.parse_block(id, Some(params_end))?;
        } else if semicolon {
            self.pos = params_end + 1;
        } else {
            self.pos = params_start + params.len();
        }
        self.set_span(id, start, self.pos);
        Ok(())
    }

    fn parse_comment(&mut self, parent: NodeId, before: String) -> Result<(), ParseError> {
        let start = self.pos;
        let end = self.skip_comment(start)?;
        let data = NodeData {
            kind: NodeKind::Comment {
                text: self.source[start + 2..end - 2].to_string(),
                inline: false,
            },
            raws: Raws {
                before,
                ..Raws::default()
            },
            span: None,
        };
        let id = self.sheet.push_child(parent, data);
        self.pos = end;
        self.set_span(id, start, end);
        Ok(())
    }

    fn parse_line_comment(&mut self, parent: NodeId, before: String) {
        let start = self.pos;
        let end = self.source[start..]
            .find('\n')
            .map_or(self.bytes.len(), |offset| start + offset);
        let data = NodeData {
            kind: NodeKind::Comment {
                text: self.source[start + 2..end].to_string(),
                inline: true,
            },
            raws: Raws {
                before,
                ..Raws::default()
            },
            span: None,
        };
        let id = self.sheet.push_child(parent, data);
        self.pos = end;
        self.set_span(id, start, end);
    }

    /// Find where the statement starting at `start` ends, skipping strings,
    /// comments, parenthesized groups and `#{...}` interpolation.
    fn scan_prelude(&self, start: usize) -> Result<Terminator, ParseError> {
        let mut i = start;
        let mut depth = 0usize;
        while let Some(&b) = self.bytes.get(i) {
            match b {
                b'"' | b'\'' => {
                    i = self.skip_string(i)?;
                    continue;
                }
                b'/' if self.bytes.get(i + 1) == Some(&b'*') => {
                    i = self.skip_comment(i)?;
                    continue;
                }
                b'#' if self.bytes.get(i + 1) == Some(&b'{') => {
                    i = self.skip_interpolation(i);
                    continue;
                }
                b'\\' => {
                    i += 2;
                    continue;
                }
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b'{' if depth == 0 => return Ok(Terminator::Open(i)),
                b';' if depth == 0 => return Ok(Terminator::Semicolon(i)),
                b'}' if depth == 0 => return Ok(Terminator::Close(i)),
                _ => {}
            }
            i += 1;
        }
        Ok(Terminator::Eof)
    }

    /// Returns the offset just past the closing quote.
    fn skip_string(&self, start: usize) -> Result<usize, ParseError> {
        let quote = self.bytes[start];
        let mut i = start + 1;
        while let Some(&b) = self.bytes.get(i) {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == quote {
                return Ok(i + 1);
            }
            i += 1;
        }
        let pos = self.lines.position(start);
        Err(ParseError::UnclosedString {
            line: pos.line,
            column: pos.column,
        })
    }

    /// Returns the offset just past `*/`.
    fn skip_comment(&self, start: usize) -> Result<usize, ParseError> {
        match self.source[start + 2..].find("*/") {
            Some(offset) => Ok(start + 2 + offset + 2),
            None => {
                let pos = self.lines.position(start);
                Err(ParseError::UnclosedComment {
                    line: pos.line,
                    column: pos.column,
                })
            }
        }
    }

    fn skip_interpolation(&self, start: usize) -> usize {
        let mut depth = 0usize;
        let mut i = start + 1;
        while let Some(&b) = self.bytes.get(i) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return i + 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        i
    }

    fn set_after(&mut self, id: NodeId, after: String) {
        if let Some(node) = self.sheet.get_mut(id) {
            node.raws.after = after;
        }
    }

    fn set_span(&mut self, id: NodeId, start: usize, end: usize) {
        let span = self.lines.span(start, end);
        if let Some(node) = self.sheet.get_mut(id) {
            node.span = Some(span);
        }
    }
}

/// Split a trailing `!important` flag off a declaration value.
///
/// Returns the bare value and the raw flag text (empty when absent).
fn split_important(value: &str) -> (&str, &str) {
    if let Some(bang) = value.rfind('!')
        && value[bang + 1..].trim().eq_ignore_ascii_case("important")
    {
        let head = value[..bang].trim_end();
        return (head, &value[head.len()..]);
    }
    (value, "")
}
