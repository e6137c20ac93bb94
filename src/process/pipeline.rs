//! The import formatting pipeline.
//!
//! [`Formatter`] owns everything derived from one [`Config`]: the resolved
//! group list, the compiled priority patterns, the kind weight table, and the
//! classifier's memo cache. Callers construct it explicitly and rebuild it
//! whenever configuration changes, which also drops the caches - there is no
//! process-wide formatter state.
//!
//! Pipeline stages: locate -> parse -> exclude -> classify -> merge -> sort ->
//! render -> align -> splice. The pipeline is synchronous, never mutates the
//! source in place, and returns structured failures instead of partial
//! results.

use std::borrow::Cow;

use regex::Regex;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{FormatError, Result};
use crate::format::{
    align_from, apply_exclusions, is_priority, merge_records, render_block, render_group,
    resolve_groups, sort_group, splice, Classifier, Exclusions, FormattedGroup, RenderOptions,
    ResolvedGroup,
};
use crate::parser::{locate_import_section, parse_import_section, ParsedImport};

/// Result of formatting one document.
#[derive(Debug)]
pub enum FormatOutcome {
    /// The document changed; the new text is carried here.
    Changed(String),
    /// The rendered imports matched the original text exactly.
    Unchanged,
}

impl FormatOutcome {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, FormatOutcome::Changed(_))
    }
}

/// A configured import formatter for one [`Config`].
pub struct Formatter {
    config: Config,
    /// Resolved groups, sorted ascending by final order.
    groups: Vec<ResolvedGroup>,
    default_index: usize,
    priority_patterns: Vec<Regex>,
    kind_weights: [i64; 5],
    classifier: Classifier,
}

impl Formatter {
    /// Build a formatter from a validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        if let Some(message) = config.validate() {
            anyhow::bail!("invalid configuration: {message}");
        }
        let groups = resolve_groups(&config.groups)?;
        let default_index = groups
            .iter()
            .position(|g| g.is_default)
            .ok_or_else(|| anyhow::anyhow!("no default group survived order resolution"))?;

        // The classifier takes one flat priority list; per-group declarations
        // are flattened here.
        let mut priority_patterns = Vec::new();
        for group in &config.groups {
            for pattern in &group.priority_patterns {
                priority_patterns.push(Regex::new(pattern).map_err(|e| {
                    anyhow::anyhow!("invalid priority pattern for group '{}': {e}", group.name)
                })?);
            }
        }

        let kind_weights = config.get_kind_weights();
        Ok(Self {
            config,
            groups,
            default_index,
            priority_patterns,
            kind_weights,
            classifier: Classifier::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolved groups in final order, mostly useful for diagnostics.
    #[must_use]
    pub fn groups(&self) -> &[ResolvedGroup] {
        &self.groups
    }

    /// Format one document.
    pub fn format_document(&mut self, source: &str) -> std::result::Result<FormatOutcome, FormatError> {
        self.format_with(source, &Exclusions::default())
    }

    /// Format one document, dropping excluded bindings and modules first.
    pub fn format_with(
        &mut self,
        source: &str,
        exclusions: &Exclusions,
    ) -> std::result::Result<FormatOutcome, FormatError> {
        let range = locate_import_section(source)?;
        if range.is_empty() {
            debug!("no import section; document left unchanged");
            return Ok(FormatOutcome::Unchanged);
        }

        let records = parse_import_section(source, &range)?;
        debug!(records = records.len(), "parsed import section");
        let mut records = apply_exclusions(records, exclusions);

        for rec in &mut records {
            let group = self
                .classifier
                .classify(&rec.module, &self.groups, self.default_index);
            rec.group = Some(group);
            rec.is_priority = is_priority(&rec.module, &self.priority_patterns);
        }

        let mut buckets: Vec<Vec<ParsedImport>> =
            (0..self.groups.len()).map(|_| Vec::new()).collect();
        for rec in records {
            let idx = rec
                .group
                .ok_or_else(|| FormatError::Render("record left unclassified".to_string()))?;
            buckets
                .get_mut(idx)
                .ok_or_else(|| FormatError::Render(format!("group index {idx} out of range")))?
                .push(rec);
        }

        let opts = RenderOptions {
            indent: self.config.indent,
            quote: self.config.quote.as_char(),
            group_comments: self.config.group_comments,
        };
        let mut formatted: Vec<FormattedGroup> = Vec::new();
        for (group, bucket) in self.groups.iter().zip(buckets) {
            if bucket.is_empty() {
                continue;
            }
            let mut merged = merge_records(bucket);
            sort_group(&mut merged, &self.kind_weights);
            debug!(group = %group.name, records = merged.len(), "rendering group");
            let mut rendered = render_group(&group.name, &merged, &opts);
            align_from(&mut rendered.lines);
            formatted.push(rendered);
        }

        let has_trailer = range.end < source.len();
        let block = render_block(&formatted, has_trailer);
        let result = splice(source, &range, &block);
        if result.changed {
            Ok(FormatOutcome::Changed(result.text.into_owned()))
        } else {
            Ok(FormatOutcome::Unchanged)
        }
    }

    /// Fail-safe formatting: any pipeline error is logged and the original
    /// text returned unchanged.
    pub fn format_lossy<'a>(&mut self, source: &'a str) -> Cow<'a, str> {
        match self.format_document(source) {
            Ok(FormatOutcome::Changed(text)) => Cow::Owned(text),
            Ok(FormatOutcome::Unchanged) => Cow::Borrowed(source),
            Err(e) => {
                error!("formatting failed, document left unchanged: {e}");
                Cow::Borrowed(source)
            }
        }
    }
}
