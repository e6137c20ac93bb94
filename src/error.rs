//! Error types and result aliases for importfmt.
//!
//! This module defines the error handling infrastructure:
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used for I/O-level plumbing
//! - [`FormatError`]: The closed failure taxonomy of the formatting pipeline
//!
//! All pipeline failures are recovered at the single-document boundary: the
//! caller reports the error and keeps the original text unchanged.

use anyhow::Result as AnyhowResult;
use thiserror::Error;

pub type Result<T> = AnyhowResult<T>;

/// Failures the formatting pipeline can report for one document.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The import section boundary could not be determined safely.
    ///
    /// Raised for dynamic import calls mixed with static imports, for
    /// non-import statements found inside the presumed import block, and for
    /// unterminated declarations.
    #[error("cannot determine import section boundary: {0}")]
    LocatorAmbiguous(String),

    /// A statement in the import section did not parse as an import
    /// declaration. Formatting is aborted entirely; no partial result is
    /// applied.
    #[error("invalid import syntax at line {line}, column {column}:\n{snippet}")]
    InvalidImportSyntax {
        line: usize,
        column: usize,
        snippet: String,
    },

    /// An internal invariant was violated during classification, merging,
    /// sorting, or rendering.
    #[error("import rendering failed: {0}")]
    Render(String),
}

impl FormatError {
    /// Build an [`FormatError::InvalidImportSyntax`] with a caret indicator
    /// under the offending column.
    #[must_use]
    pub fn invalid_syntax(raw: &str, line: usize, column: usize) -> Self {
        let first_line = raw.lines().next().unwrap_or(raw);
        let caret_offset = column.saturating_sub(1).min(first_line.len());
        let snippet = format!("{}\n{}^", first_line, " ".repeat(caret_offset));
        FormatError::InvalidImportSyntax {
            line,
            column,
            snippet,
        }
    }
}
