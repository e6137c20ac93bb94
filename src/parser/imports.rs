//! Structural parser: import statements to [`ParsedImport`] records.
//!
//! Operates on the byte range produced by the Section Locator. Statements are
//! split with comment-aware scanning (string contents stay intact, since the
//! module specifier lives in one), then matched against the precompiled
//! patterns. The first statement that fails to parse aborts the whole run
//! with [`FormatError::InvalidImportSyntax`]; no recovery is attempted.

use crate::error::FormatError;

use super::char_filter::CharFilter;
use super::locator::ImportRange;
use super::patterns::{
    DEFAULT_RE, NAMED_RE, NAMESPACE_RE, SIDE_EFFECT_RE, SPECIFIER_RE, TYPE_DEFAULT_RE,
    TYPE_NAMED_RE,
};

/// Declaration kind of an import record.
///
/// Closed and exhaustive: the sorter and renderer branch on this and the
/// compiler checks the match arms for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    Default,
    Named,
    TypeDefault,
    TypeNamed,
    SideEffect,
}

impl ImportKind {
    /// Index into the five-slot kind weight table.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            ImportKind::Default => 0,
            ImportKind::Named => 1,
            ImportKind::TypeDefault => 2,
            ImportKind::TypeNamed => 3,
            ImportKind::SideEffect => 4,
        }
    }

    /// Whether the kind carries the `type` marker when rendered.
    #[must_use]
    pub fn is_type_only(self) -> bool {
        matches!(self, ImportKind::TypeDefault | ImportKind::TypeNamed)
    }
}

/// One parsed import declaration.
#[derive(Debug, Clone)]
pub struct ParsedImport {
    pub kind: ImportKind,
    /// Module specifier, without quotes.
    pub module: String,
    /// Default binding, or the verbatim `* as ns` clause for namespace form.
    pub default_name: Option<String>,
    /// Named specifiers, whitespace-normalized (`a as b`, `type X`).
    pub specifiers: Vec<String>,
    /// Original statement text.
    pub raw: String,
    /// 1-based line of the statement start within the document.
    pub line: usize,
    pub is_priority: bool,
    /// Index into the resolved group list, assigned by the classifier.
    pub group: Option<usize>,
}

impl ParsedImport {
    fn new(kind: ImportKind, module: &str, raw: &str, line: usize) -> Self {
        Self {
            kind,
            module: module.to_string(),
            default_name: None,
            specifiers: Vec::new(),
            raw: raw.to_string(),
            line,
            is_priority: false,
            group: None,
        }
    }

    /// True when the record binds nothing (renders in side-effect form).
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.default_name.is_none() && self.specifiers.is_empty()
    }
}

/// Compute the 1-based line/column of a byte offset.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let prefix = &source[..offset];
    let line = prefix.matches('\n').count() + 1;
    let column = offset - prefix.rfind('\n').map_or(0, |p| p + 1) + 1;
    (line, column)
}

/// Whether only whitespace including at least one newline separates item `i`
/// from the previous non-whitespace item. Semicolon-less statements only end
/// at line boundaries.
fn preceded_by_newline(items: &[(usize, char)], i: usize) -> bool {
    for k in (0..i).rev() {
        let c = items[k].1;
        if c == '\n' {
            return true;
        }
        if !c.is_whitespace() {
            return false;
        }
    }
    false
}

/// Check whether the filtered items at `i` spell the given keyword on a word
/// boundary.
fn is_word_at(items: &[(usize, char)], i: usize, word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    if i + chars.len() > items.len() {
        return false;
    }
    for (k, &wc) in chars.iter().enumerate() {
        if items[i + k].1 != wc {
            return false;
        }
    }
    let ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    if i > 0 && ident(items[i - 1].1) {
        return false;
    }
    if let Some(&(_, after)) = items.get(i + chars.len()) {
        if ident(after) {
            return false;
        }
    }
    true
}

/// Parse every import declaration inside the located range.
pub fn parse_import_section(
    source: &str,
    range: &ImportRange,
) -> Result<Vec<ParsedImport>, FormatError> {
    let text = &source[range.start..range.end];
    let items: Vec<(usize, char)> = CharFilter::new(text, true, false).collect();
    let mut records = Vec::new();

    let mut i = 0;
    while i < items.len() {
        let (pos, ch) = items[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }
        if !is_word_at(&items, i, "import") {
            let (line, column) = line_col(source, range.start + pos);
            return Err(FormatError::invalid_syntax(&text[pos..], line, column));
        }

        // Consume one statement: up to a top-level semicolon, or (for
        // semicolon-less code) up to the next `import` keyword or the end of
        // the range.
        let start_item = i;
        let start_pos = pos;
        let mut stmt_code = String::new();
        let mut depth = 0i32;
        let mut string_delim: Option<char> = None;
        let mut end_byte: Option<usize> = None;
        let mut last_code_end = start_pos;
        let mut j = i;
        while j < items.len() {
            let (p, c) = items[j];

            // String contents never affect statement structure: a module
            // named 'import-helpers' or one containing braces must not end
            // the statement early.
            if let Some(delim) = string_delim {
                stmt_code.push(c);
                last_code_end = p + c.len_utf8();
                if c == '\\' {
                    if let Some(&(ep, ec)) = items.get(j + 1) {
                        stmt_code.push(ec);
                        last_code_end = ep + ec.len_utf8();
                        j += 1;
                    }
                } else if c == delim {
                    string_delim = None;
                }
                j += 1;
                continue;
            }

            if depth <= 0
                && j > start_item
                && preceded_by_newline(items.as_slice(), j)
                && is_word_at(&items, j, "import")
            {
                break;
            }

            stmt_code.push(c);
            if !c.is_whitespace() {
                last_code_end = p + c.len_utf8();
            }
            match c {
                '\'' | '"' => string_delim = Some(c),
                '{' => depth += 1,
                '}' => depth -= 1,
                ';' if depth <= 0 => {
                    end_byte = Some(p + 1);
                    j += 1;
                }
                _ => {}
            }
            if end_byte.is_some() {
                break;
            }
            j += 1;
        }

        let end = end_byte.unwrap_or(last_code_end);
        let raw = &text[start_pos..end];
        let (line, column) = line_col(source, range.start + start_pos);
        records.push(parse_statement(stmt_code.trim_end(), raw, line, column)?);
        i = j;
    }

    Ok(records)
}

/// Parse one comment-stripped import statement.
fn parse_statement(
    code: &str,
    raw: &str,
    line: usize,
    column: usize,
) -> Result<ParsedImport, FormatError> {
    if let Some(caps) = TYPE_NAMED_RE.captures(code) {
        let mut rec = ParsedImport::new(ImportKind::TypeNamed, &caps[3], raw, line);
        rec.specifiers = parse_specifiers(&caps[1], raw, line, column)?;
        return Ok(rec);
    }
    if let Some(caps) = TYPE_DEFAULT_RE.captures(code) {
        let mut rec = ParsedImport::new(ImportKind::TypeDefault, &caps[3], raw, line);
        rec.default_name = Some(caps[1].to_string());
        return Ok(rec);
    }
    if let Some(caps) = NAMED_RE.captures(code) {
        let mut rec = ParsedImport::new(ImportKind::Named, &caps[4], raw, line);
        rec.default_name = caps.get(1).map(|m| m.as_str().to_string());
        rec.specifiers = parse_specifiers(&caps[2], raw, line, column)?;
        return Ok(rec);
    }
    if let Some(caps) = NAMESPACE_RE.captures(code) {
        let mut rec = ParsedImport::new(ImportKind::Default, &caps[3], raw, line);
        rec.default_name = Some(format!("* as {}", &caps[1]));
        return Ok(rec);
    }
    if let Some(caps) = DEFAULT_RE.captures(code) {
        let mut rec = ParsedImport::new(ImportKind::Default, &caps[3], raw, line);
        rec.default_name = Some(caps[1].to_string());
        return Ok(rec);
    }
    if let Some(caps) = SIDE_EFFECT_RE.captures(code) {
        return Ok(ParsedImport::new(ImportKind::SideEffect, &caps[2], raw, line));
    }
    Err(FormatError::invalid_syntax(raw, line, column))
}

/// Split and validate the inside of a named-import brace list.
fn parse_specifiers(
    inner: &str,
    raw: &str,
    line: usize,
    column: usize,
) -> Result<Vec<String>, FormatError> {
    let mut specifiers = Vec::new();
    for piece in inner.split(',') {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
        if !SPECIFIER_RE.is_match(&normalized) {
            return Err(FormatError::invalid_syntax(raw, line, column));
        }
        specifiers.push(normalized);
    }
    Ok(specifiers)
}
