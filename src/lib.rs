//! importfmt - Canonical import-block formatter for JavaScript and TypeScript
//!
//! Rewrites the import section at the top of a source file into a canonical
//! form - grouped, deduplicated, ordered, and vertically aligned - while
//! leaving everything outside the import block byte-for-byte untouched.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod format;
pub mod parser;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::{Config, GroupConfig, QuoteStyle};
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::{FormatError, Result};
pub use format::Exclusions;
pub use parser::{ImportKind, ImportRange, ParsedImport};
pub use process::{FormatOutcome, Formatter};
