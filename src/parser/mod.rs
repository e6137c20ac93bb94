//! Import section parsing utilities.
//!
//! This module provides the infrastructure for reading the import section of
//! a source document:
//! - [`CharFilter`]: Iterator adapter that identifies strings, comments, and code regions
//! - [`locator`]: Finds the byte range of the import section, or refuses safely
//! - [`imports`]: Parses located statements into [`ParsedImport`] records
//! - [`patterns`]: Precompiled regex patterns for import syntax elements
//!
//! The scanner tracks string and template-literal state explicitly, so text
//! that merely looks like code inside a literal never influences location or
//! parsing decisions.

pub mod char_filter;
pub mod imports;
pub mod locator;
pub mod patterns;

pub use char_filter::{CharFilter, ScanState, StringDelimiter};
pub use imports::{parse_import_section, ImportKind, ParsedImport};
pub use locator::{locate_import_section, ImportRange};
