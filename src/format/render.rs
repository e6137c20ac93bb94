//! Renderer - produces formatted text lines per group.
//!
//! Line shapes:
//! - bare record: `import 'module';`
//! - default only: `import Name from 'module';` (with `type` marker when type-only)
//! - one named specifier: `import { a } from 'module';`
//! - several named specifiers: multi-line brace form, one specifier per line
//!
//! The cleanup pass assembles the whole block: one comment header per
//! distinct group name, blank-line runs collapsed to one, and the block
//! terminated by exactly one blank line before the rest of the document.

use std::collections::HashSet;

use crate::parser::ParsedImport;

/// Formatting options consumed by the renderer.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Spaces of indentation for multi-line specifier lists.
    pub indent: usize,
    /// Quote character for module specifiers.
    pub quote: char,
    /// Whether to emit a `// name` header above each group.
    pub group_comments: bool,
}

/// Rendered lines of one group; ephemeral, consumed by the splicer.
#[derive(Debug)]
pub struct FormattedGroup {
    pub name: String,
    pub comment: Option<String>,
    pub lines: Vec<String>,
}

/// Render one group's ordered, merged records.
#[must_use]
pub fn render_group(name: &str, records: &[ParsedImport], opts: &RenderOptions) -> FormattedGroup {
    let mut lines = Vec::new();
    for rec in records {
        lines.extend(render_record(rec, opts));
    }
    FormattedGroup {
        name: name.to_string(),
        comment: opts.group_comments.then(|| format!("// {name}")),
        lines,
    }
}

/// Render one record into one or more physical lines.
fn render_record(rec: &ParsedImport, opts: &RenderOptions) -> Vec<String> {
    let q = opts.quote;
    let module = format!("{q}{}{q}", rec.module);
    let marker = if rec.kind.is_type_only() { "type " } else { "" };

    if rec.is_bare() {
        return vec![format!("import {module};")];
    }

    if rec.specifiers.is_empty() {
        let name = rec.default_name.as_deref().unwrap_or_default();
        return vec![format!("import {marker}{name} from {module};")];
    }

    let head = match &rec.default_name {
        Some(name) => format!("import {marker}{name}, "),
        None => format!("import {marker}"),
    };

    if rec.specifiers.len() == 1 {
        return vec![format!("{head}{{ {} }} from {module};", rec.specifiers[0])];
    }

    let mut lines = vec![format!("{head}{{")];
    let indent = " ".repeat(opts.indent);
    for (i, spec) in rec.specifiers.iter().enumerate() {
        let comma = if i + 1 < rec.specifiers.len() { "," } else { "" };
        lines.push(format!("{indent}{spec}{comma}"));
    }
    lines.push(format!("}} from {module};"));
    lines
}

/// Assemble the rendered groups into the final block text.
///
/// `has_trailer` marks whether document content follows the import section;
/// when it does, the block ends with exactly one blank line.
#[must_use]
pub fn render_block(groups: &[FormattedGroup], has_trailer: bool) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut seen_names: HashSet<&str> = HashSet::new();

    for group in groups {
        if group.lines.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        if let Some(comment) = &group.comment {
            if seen_names.insert(group.name.as_str()) {
                lines.push(comment.clone());
            }
        }
        lines.extend(group.lines.iter().cloned());
    }

    if lines.is_empty() {
        return String::new();
    }

    // Collapse runs of consecutive blank lines to exactly one
    let mut collapsed: Vec<String> = Vec::new();
    let mut prev_blank = false;
    for line in lines {
        let blank = line.is_empty();
        if !(blank && prev_blank) {
            collapsed.push(line);
        }
        prev_blank = blank;
    }

    let mut text = collapsed.join("\n");
    text.push('\n');
    if has_trailer {
        text.push('\n');
    }
    text
}
