//! Section Locator - finds the byte range of the import section.
//!
//! Scans the document line by line, carrying string and block-comment state
//! across lines, and returns the contiguous byte range that contains only
//! import declarations and interleaved comments. The locator either succeeds
//! (possibly with an empty range, meaning "no imports present") or fails with
//! [`FormatError::LocatorAmbiguous`]; it never returns a partial result.

use crate::directive::is_directive_line;
use crate::error::FormatError;

use super::char_filter::{CharFilter, ScanState};
use super::patterns::{DYNAMIC_IMPORT_RE, EXPORT_STMT_RE, IMPORT_STMT_RE, PROLOGUE_RE};

/// Byte range of the import section within a document.
///
/// `start == end` means the document has no import section, which is a valid
/// outcome, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportRange {
    pub start: usize,
    pub end: usize,
}

impl ImportRange {
    pub const EMPTY: ImportRange = ImportRange { start: 0, end: 0 };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One physical line with its byte span (end includes the line terminator).
struct Line<'a> {
    start: usize,
    end: usize,
    raw: &'a str,
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for piece in source.split_inclusive('\n') {
        let end = offset + piece.len();
        let without_nl = piece.strip_suffix('\n').unwrap_or(piece);
        let raw = without_nl.strip_suffix('\r').unwrap_or(without_nl);
        lines.push(Line {
            start: offset,
            end,
            raw,
        });
        offset = end;
    }
    lines
}

/// Net brace depth change contributed by one line of filtered code.
fn brace_delta(code: &str) -> i32 {
    let mut depth = 0i32;
    for c in code.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// Check whether a depth-zero line carries statements other than imports.
///
/// The line's filtered code is split at top-level semicolons; every segment
/// must be empty or start another import declaration. When
/// `first_segment_is_tail` is set, the first segment is the tail of a
/// declaration begun on an earlier line and is accepted as-is.
fn has_foreign_code(code: &str, first_segment_is_tail: bool) -> bool {
    let mut depth = 0i32;
    let mut seg_start = 0;
    let mut first = true;

    let segment_ok = |seg: &str, is_tail: bool| {
        seg.trim().is_empty() || is_tail || IMPORT_STMT_RE.is_match(seg)
    };

    for (i, c) in code.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            ';' if depth <= 0 => {
                if !segment_ok(&code[seg_start..i], first && first_segment_is_tail) {
                    return true;
                }
                seg_start = i + 1;
                first = false;
            }
            _ => {}
        }
    }
    !segment_ok(&code[seg_start..], first && first_segment_is_tail)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Import,
    Export,
}

/// Locate the import section of a document.
///
/// Returns the byte range covering the imports plus swallowed surrounding
/// blank/comment lines, [`ImportRange::EMPTY`] when the document has no
/// header import section, or [`FormatError::LocatorAmbiguous`] when the
/// boundary cannot be determined safely.
pub fn locate_import_section(source: &str) -> Result<ImportRange, FormatError> {
    let lines = split_lines(source);
    let mut state = ScanState::default();
    let mut first_import: Option<usize> = None;
    let mut last_import: Option<usize> = None;
    let mut pending: Option<(PendingKind, i32)> = None;
    let mut interleaved = false;

    for (idx, line) in lines.iter().enumerate() {
        let mut filter = CharFilter::with_state(line.raw, true, true, state);
        let code = filter.filter_all();
        state = filter.scan_state();
        let trimmed = code.trim();

        // Continuation of a multi-line import/export declaration
        if let Some((kind, depth)) = pending.take() {
            if DYNAMIC_IMPORT_RE.is_match(&code) {
                return Err(FormatError::LocatorAmbiguous(
                    "dynamic import call inside an import declaration".to_string(),
                ));
            }
            let depth = depth + brace_delta(&code);
            if depth > 0 {
                pending = Some((kind, depth));
            } else {
                if kind == PendingKind::Import {
                    if has_foreign_code(&code, true) {
                        return Err(FormatError::LocatorAmbiguous(
                            "statement shares a line with an import declaration".to_string(),
                        ));
                    }
                    last_import = Some(idx);
                }
                // The closing line of an export keeps the block open but is
                // never part of the located range.
            }
            continue;
        }

        // Blank lines, comment-only lines, and lines swallowed whole by an
        // open block comment neither start nor terminate the block.
        if trimmed.is_empty() {
            continue;
        }

        if DYNAMIC_IMPORT_RE.is_match(&code) {
            if first_import.is_none() {
                return Err(FormatError::LocatorAmbiguous(
                    "dynamic import call before any static import".to_string(),
                ));
            }
            if IMPORT_STMT_RE.is_match(&code) {
                return Err(FormatError::LocatorAmbiguous(
                    "dynamic import call mixed with static imports".to_string(),
                ));
            }
            // A dynamic import in the statement that follows the block is
            // body code; it only becomes ambiguous if more static imports
            // turn up after it.
            interleaved = true;
            continue;
        }

        if IMPORT_STMT_RE.is_match(&code) {
            if interleaved {
                return Err(FormatError::LocatorAmbiguous(
                    "non-import statement between import declarations".to_string(),
                ));
            }
            let depth = brace_delta(&code);
            if depth > 0 {
                if first_import.is_none() {
                    first_import = Some(idx);
                }
                pending = Some((PendingKind::Import, depth));
            } else {
                if has_foreign_code(&code, false) {
                    return Err(FormatError::LocatorAmbiguous(
                        "statement shares a line with an import declaration".to_string(),
                    ));
                }
                if first_import.is_none() {
                    first_import = Some(idx);
                }
                last_import = Some(idx);
            }
            continue;
        }

        if EXPORT_STMT_RE.is_match(&code) {
            // Exports never terminate the scan, but the range must not extend
            // over one: a further import would trap this export inside the
            // spliced region, so it is flagged for the check above.
            if first_import.is_some() {
                interleaved = true;
            }
            let depth = brace_delta(&code);
            if depth > 0 {
                pending = Some((PendingKind::Export, depth));
            }
            continue;
        }

        if first_import.is_none() {
            if PROLOGUE_RE.is_match(line.raw) {
                continue;
            }
            // Code before any import: the file has no header import section.
            return Ok(ImportRange::EMPTY);
        }

        // First non-import, non-comment, non-export statement after the
        // imports terminates the block (exclusive).
        break;
    }

    if matches!(pending, Some((PendingKind::Import, _))) {
        return Err(FormatError::LocatorAmbiguous(
            "unterminated import declaration".to_string(),
        ));
    }

    let (Some(first), Some(last)) = (first_import, last_import) else {
        return Ok(ImportRange::EMPTY);
    };

    // Backward extension: swallow the comment run directly adjacent to the
    // first import (previously rendered group headers live there). A blank
    // line above a swallowed comment ends the extension, and a blank run that
    // does not reach the top of the file stays outside the range - it is a
    // separator owned by whatever precedes it.
    let mut start_line = first;
    let mut saw_comment = false;
    while start_line > 0 {
        let t = lines[start_line - 1].raw.trim();
        if t.is_empty() {
            if saw_comment {
                break;
            }
            start_line -= 1;
        } else if t.starts_with("//") && !is_directive_line(t) {
            saw_comment = true;
            start_line -= 1;
        } else {
            break;
        }
    }
    if start_line > 0 {
        while start_line < first && lines[start_line].raw.trim().is_empty() {
            start_line += 1;
        }
    }

    // Forward extension: swallow blank lines only, never trailing comments.
    let mut end_line = last;
    while end_line + 1 < lines.len() && lines[end_line + 1].raw.trim().is_empty() {
        end_line += 1;
    }

    Ok(ImportRange {
        start: lines[start_line].start,
        end: lines[end_line].end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(source: &str) -> ImportRange {
        locate_import_section(source).unwrap()
    }

    #[test]
    fn test_simple_block() {
        let src = "import a from 'a';\nimport b from 'b';\n\nconst x = 1;\n";
        let range = locate(src);
        assert_eq!(range.start, 0);
        assert_eq!(&src[range.end..], "const x = 1;\n");
    }

    #[test]
    fn test_no_imports_is_empty_range() {
        let range = locate("const x = 1;\n");
        assert!(range.is_empty());
    }

    #[test]
    fn test_empty_source() {
        assert!(locate("").is_empty());
    }

    #[test]
    fn test_code_before_imports_is_empty_range() {
        let src = "const x = 1;\nimport a from 'a';\n";
        assert!(locate(src).is_empty());
    }

    #[test]
    fn test_prologue_is_skipped() {
        let src = "'use strict';\nimport a from 'a';\nrun();\n";
        let range = locate(src);
        assert_eq!(&src[range.start..range.end], "import a from 'a';\n");
    }

    #[test]
    fn test_dynamic_import_fails() {
        let src = "import a from 'a';\nconst m = await import('./x');\nimport b from 'b';\n";
        let err = locate_import_section(src).unwrap_err();
        assert!(matches!(err, FormatError::LocatorAmbiguous(_)));
    }

    #[test]
    fn test_dynamic_import_before_static_fails() {
        let src = "const m = await import('./x');\nimport a from 'a';\n";
        assert!(locate_import_section(src).is_err());
    }

    #[test]
    fn test_dynamic_import_after_block_is_body_code() {
        let src = "import a from 'a';\n\nconst load = () => import('./lazy');\n";
        let range = locate(src);
        assert_eq!(&src[range.start..range.end], "import a from 'a';\n\n");
    }

    #[test]
    fn test_dynamic_import_on_import_line_fails() {
        let src = "import a from 'a'; register(import('./x'));\n";
        assert!(locate_import_section(src).is_err());
    }

    #[test]
    fn test_dynamic_import_in_string_is_ignored() {
        let src = "const s = `import('x')`;\nimport a from 'a';\n";
        // The template is code before any import, so there is no header block,
        // but it must not be reported as a dynamic import.
        assert!(locate(src).is_empty());
    }

    #[test]
    fn test_dynamic_import_in_comment_is_ignored() {
        let src = "// import('x') is lazy\nimport a from 'a';\ncode();\n";
        let range = locate(src);
        assert_eq!(range.start, 0);
        assert_eq!(&src[range.start..range.end], "// import('x') is lazy\nimport a from 'a';\n");
    }

    #[test]
    fn test_multiline_import() {
        let src = "import {\n  a,\n  b\n} from 'mod';\ncode();\n";
        let range = locate(src);
        assert_eq!(&src[range.start..range.end], "import {\n  a,\n  b\n} from 'mod';\n");
    }

    #[test]
    fn test_unterminated_import_fails() {
        let src = "import {\n  a,\n";
        assert!(locate_import_section(src).is_err());
    }

    #[test]
    fn test_comment_between_imports_is_interior() {
        let src = "import a from 'a';\n// glue\nimport b from 'b';\ncode();\n";
        let range = locate(src);
        assert!(src[range.start..range.end].contains("// glue"));
        assert!(src[range.start..range.end].ends_with("import b from 'b';\n"));
    }

    #[test]
    fn test_export_after_imports_ends_range_before_it() {
        let src = "import a from 'a';\nexport { a };\ncode();\n";
        let range = locate(src);
        assert_eq!(&src[range.start..range.end], "import a from 'a';\n");
    }

    #[test]
    fn test_import_after_export_fails() {
        let src = "import a from 'a';\nexport { a };\nimport b from 'b';\n";
        let err = locate_import_section(src).unwrap_err();
        assert!(matches!(err, FormatError::LocatorAmbiguous(_)));
    }

    #[test]
    fn test_multiline_export_before_imports() {
        let src = "export {\n  thing\n} from './thing';\nimport a from 'a';\ncode();\n";
        let range = locate(src);
        assert_eq!(&src[range.start..range.end], "import a from 'a';\n");
    }

    #[test]
    fn test_code_sharing_import_line_fails() {
        let src = "import a from 'a'; const x = 1;\n";
        assert!(locate_import_section(src).is_err());
    }

    #[test]
    fn test_two_imports_on_one_line_are_fine() {
        let src = "import a from 'a'; import b from 'b';\ncode();\n";
        let range = locate(src);
        assert_eq!(
            &src[range.start..range.end],
            "import a from 'a'; import b from 'b';\n"
        );
    }

    #[test]
    fn test_backward_swallows_adjacent_line_comments() {
        let src = "// externals\nimport a from 'a';\ncode();\n";
        let range = locate(src);
        assert_eq!(range.start, 0);
    }

    #[test]
    fn test_backward_preserves_detached_header() {
        let src = "/* Copyright */\n\nimport a from 'a';\ncode();\n";
        let range = locate(src);
        assert_eq!(&src[range.start..range.end], "import a from 'a';\n");
    }

    #[test]
    fn test_backward_stops_at_blank_above_comment_run() {
        let src = "/* Copyright */\n\n// externals\nimport a from 'a';\ncode();\n";
        let range = locate(src);
        assert_eq!(
            &src[range.start..range.end],
            "// externals\nimport a from 'a';\n"
        );
    }

    #[test]
    fn test_leading_blanks_at_top_of_file_are_swallowed() {
        let src = "\n\nimport a from 'a';\ncode();\n";
        let range = locate(src);
        assert_eq!(range.start, 0);
    }

    #[test]
    fn test_forward_swallows_blank_lines_only() {
        let src = "import a from 'a';\n\n\n// trailing note\ncode();\n";
        let range = locate(src);
        assert_eq!(&src[range.end..], "// trailing note\ncode();\n");
    }

    #[test]
    fn test_imports_only_file() {
        let src = "import a from 'a';\nimport b from 'b';\n";
        let range = locate(src);
        assert_eq!(range.start, 0);
        assert_eq!(range.end, src.len());
    }

    #[test]
    fn test_block_comment_spanning_lines_is_interior() {
        let src = "import a from 'a';\n/* note\n   spans lines */\nimport b from 'b';\nx();\n";
        let range = locate(src);
        assert!(src[range.start..range.end].ends_with("import b from 'b';\n"));
    }
}
