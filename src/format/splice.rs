//! Splicer - replaces the located range with the rendered block.
//!
//! The result borrows the original document when nothing changed, so callers
//! can detect a no-op without comparing whole documents.

use std::borrow::Cow;

use crate::parser::ImportRange;

/// Outcome of splicing the rendered block into the document.
#[derive(Debug)]
pub struct SpliceResult<'a> {
    pub text: Cow<'a, str>,
    pub changed: bool,
}

/// Splice `rendered` over `range` in `source`.
#[must_use]
pub fn splice<'a>(source: &'a str, range: &ImportRange, rendered: &str) -> SpliceResult<'a> {
    if &source[range.start..range.end] == rendered {
        return SpliceResult {
            text: Cow::Borrowed(source),
            changed: false,
        };
    }
    let mut text =
        String::with_capacity(source.len() - (range.end - range.start) + rendered.len());
    text.push_str(&source[..range.start]);
    text.push_str(rendered);
    text.push_str(&source[range.end..]);
    SpliceResult {
        text: Cow::Owned(text),
        changed: true,
    }
}
