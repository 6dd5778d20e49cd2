#![forbid(unsafe_code)]

//! Position-stable multi-range string editing
//!
//! Edits are recorded against offsets in the original text and applied in one
//! pass at the end, so replacing one range never shifts the offsets of another.

use crate::error::EditError;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/// A set of pending replacements over an immutable source string
#[derive(Debug, Clone)]
pub struct EditBuffer<'a> {
    source: &'a str,
    /// Sorted by start offset, never overlapping
    edits: Vec<Edit>,
}

impl<'a> EditBuffer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// Original text of a range, regardless of pending edits.
    pub fn slice(&self, range: Range<usize>) -> Option<&'a str> {
        self.source.get(range)
    }

    /// Replace `range` of the original text with `text`.
    ///
    /// # Errors
    ///
    /// Returns `EditError` if the range is out of bounds, splits a character,
    /// or overlaps a range that already has an edit.
    pub fn update(&mut self, range: Range<usize>, text: impl Into<String>) -> Result<(), EditError> {
        let Range { start, end } = range;
        if start > end || end > self.source.len() {
            return Err(EditError::OutOfBounds {
                start,
                end,
                len: self.source.len(),
            });
        }
        if !self.source.is_char_boundary(start) || !self.source.is_char_boundary(end) {
            return Err(EditError::NotCharBoundary { start, end });
        }

        let index = self.edits.partition_point(|edit| edit.range.start < start);
        let overlaps_prev = index > 0 && self.edits[index - 1].range.end > start;
        let overlaps_next = self
            .edits
            .get(index)
            .is_some_and(|next| next.range.start < end || next.range.start == start);
        if overlaps_prev || overlaps_next {
            return Err(EditError::Overlap { start, end });
        }

        self.edits.insert(
            index,
            Edit {
                range: start..end,
                text: text.into(),
            },
        );
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply every edit and return the resulting text.
    pub fn finish(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for edit in &self.edits {
            out.push_str(&self.source[cursor..edit.range.start]);
            out.push_str(&edit.text);
            cursor = edit.range.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

/// Replace every range of `value` with `replacer` applied to its original text.
///
/// # Errors
///
/// Returns `EditError` if any range is invalid or ranges overlap.
pub fn replace_ranges(
    value: &str,
    ranges: &[Range<usize>],
    replacer: impl Fn(&str) -> String,
) -> Result<String, EditError> {
    let mut buffer = EditBuffer::new(value);
    for range in ranges {
        let part = buffer
            .slice(range.clone())
            .ok_or(EditError::NotCharBoundary {
                start: range.start,
                end: range.end,
            })?;
        buffer.update(range.clone(), replacer(part))?;
    }
    Ok(buffer.finish())
}
