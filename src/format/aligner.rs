//! Alignment pass - pads rendered lines so every `from` keyword in a group
//! starts at the same column.
//!
//! The natural column is the position immediately after the import clause for
//! single-line forms, and immediately after the closing brace on the final
//! physical line for multi-line forms. Lines without a `from` clause
//! (side-effect imports, specifier lines, brace openers) are left alone.

use crate::parser::patterns::FROM_TAIL_RE;

/// Align the `from` keywords of one rendered group in place.
///
/// Idempotent: pre-`from` content is measured with trailing padding trimmed,
/// so running the pass twice produces identical output.
pub fn align_from(lines: &mut [String]) {
    let mut max_pre = 0;
    let mut any = false;
    for line in lines.iter() {
        if let Some(m) = FROM_TAIL_RE.find(line) {
            max_pre = max_pre.max(line[..m.start()].trim_end().len());
            any = true;
        }
    }
    if !any {
        return;
    }
    for line in lines.iter_mut() {
        if let Some(m) = FROM_TAIL_RE.find(line) {
            let pre = line[..m.start()].trim_end();
            let padding = " ".repeat(max_pre - pre.len() + 1);
            // m.start() is the separator space; the tail starts at `from`
            *line = format!("{pre}{padding}{}", &line[m.start() + 1..]);
        }
    }
}
