/// Regex patterns for import declaration syntax
///
/// All patterns are compiled once at startup using `LazyLock`.
///
/// These patterns are applied to comment-stripped statement text, so they do
/// not need to account for comments. Patterns that inspect scanner output
/// (`DYNAMIC_IMPORT_RE`, `IMPORT_STMT_RE`, ...) run on code with strings
/// already filtered out by `CharFilter`.
use std::sync::LazyLock;

use regex::Regex;

/// Build a regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. This is acceptable because all patterns
/// in this module are compile-time constants that are verified by tests.
/// The panic occurs at first access of the `LazyLock` static.
fn build_re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

// An ECMAScript-ish identifier. `$` is legal; full unicode identifiers are
// covered by \w, which the regex crate resolves with unicode semantics.
const IDENT: &str = r"[A-Za-z_$][\w$]*";

// ===== SCANNER PATTERNS (string-filtered code) =====

/// Start of a static import declaration
pub static IMPORT_STMT_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^\s*import\b"));

/// Start of an export declaration
pub static EXPORT_STMT_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^\s*export\b"));

/// Dynamic import expression form, with or without an awaiting keyword
pub static DYNAMIC_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\bimport\s*\("));

/// Directive prologue such as 'use strict' (applied to raw line text)
pub static PROLOGUE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r#"^\s*(['"])use [^'"]*['"]\s*;?\s*$"#));

// ===== STATEMENT PATTERNS (comment-stripped statement text) =====

/// `import 'module';`
pub static SIDE_EFFECT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r#"^\s*import\s*(['"])([^'"]+)['"]\s*;?\s*$"#));

/// `import Name from 'module';`
pub static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r#"^\s*import\s+({IDENT})\s+from\s*(['"])([^'"]+)['"]\s*;?\s*$"#
    ))
});

/// `import * as ns from 'module';`
pub static NAMESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r#"^\s*import\s*\*\s*as\s+({IDENT})\s+from\s*(['"])([^'"]+)['"]\s*;?\s*$"#
    ))
});

/// `import { a, b } from 'module';` with an optional leading default binding
pub static NAMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r#"^\s*import\s*(?:({IDENT})\s*,\s*)?\{{([^}}]*)\}}\s*from\s*(['"])([^'"]+)['"]\s*;?\s*$"#
    ))
});

/// `import type Name from 'module';`
pub static TYPE_DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r#"^\s*import\s+type\s+({IDENT})\s+from\s*(['"])([^'"]+)['"]\s*;?\s*$"#
    ))
});

/// `import type { A, B } from 'module';`
pub static TYPE_NAMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r#"^\s*import\s+type\s*\{{([^}}]*)\}}\s*from\s*(['"])([^'"]+)['"]\s*;?\s*$"#
    ))
});

/// One named specifier: `A`, `A as B`, `type A`, `type A as B`, `default as C`
pub static SPECIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"^(?:type\s+)?{IDENT}(?:\s+as\s+{IDENT})?$"
    ))
});

// ===== RENDERED OUTPUT PATTERNS =====

/// The `from 'module';` tail of a rendered line, used by the alignment pass
pub static FROM_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r#" from (['"])[^'"]*['"];$"#));
