//! Inline directive parsing for `// importfmt:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `// importfmt: --indent 2 --quote double`
//!
//! `// importfmt: off` disables formatting for the whole file.

use std::io::BufRead;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::QuoteStyle;

/// Pattern to match importfmt directives
static IMPORTFMT_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//\s*importfmt:\s*(.*?)\s*$").unwrap());

/// How many leading lines of a file are scanned for a directive
const DIRECTIVE_SCAN_LINES: usize = 32;

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone)]
pub struct DirectiveOverrides {
    /// Skip formatting this file entirely
    pub off: bool,
    pub indent: Option<usize>,
    pub quote: Option<QuoteStyle>,
    pub group_comments: Option<bool>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.off && self.indent.is_none() && self.quote.is_none() && self.group_comments.is_none()
    }
}

/// Check if a line contains an importfmt directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    IMPORTFMT_DIRECTIVE_RE.is_match(line)
}

/// Parse an importfmt directive line and return option overrides
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a valid directive
/// * `None` if the line is not a directive
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = IMPORTFMT_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();
    Some(parse_directive_args(args_str))
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> DirectiveOverrides {
    let mut overrides = DirectiveOverrides::default();
    let tokens: Vec<&str> = args_str.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "off" => {
                overrides.off = true;
            }
            "-i" | "--indent" => {
                i += 1;
                if i < tokens.len() {
                    overrides.indent = tokens[i].parse().ok();
                }
            }
            "-q" | "--quote" => {
                i += 1;
                if i < tokens.len() {
                    overrides.quote = match tokens[i] {
                        "single" => Some(QuoteStyle::Single),
                        "double" => Some(QuoteStyle::Double),
                        _ => None,
                    };
                }
            }
            "--group-comments" => {
                overrides.group_comments = Some(true);
            }
            "--no-group-comments" => {
                overrides.group_comments = Some(false);
            }
            _ => {}
        }
        i += 1;
    }

    overrides
}

/// Scan the first lines of a file for a directive
///
/// Returns the first directive found, or None.
pub fn find_directive<R: BufRead>(reader: &mut R) -> Option<DirectiveOverrides> {
    let mut line = String::new();
    for _ in 0..DIRECTIVE_SCAN_LINES {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                if let Some(overrides) = parse_directive(&line) {
                    return Some(overrides);
                }
            }
        }
    }
    None
}
