//! Deduplicator/Merger - collapses records targeting the same module and
//! declaration kind, and applies exclusion sets supplied by unused-import
//! detection.

use std::collections::{HashMap, HashSet};

use crate::parser::{ImportKind, ParsedImport};

/// Names and modules to drop before grouping.
///
/// Supplied by an external unused/missing-import detector; empty by default.
#[derive(Debug, Default, Clone)]
pub struct Exclusions {
    /// Local binding names to drop from records.
    pub specifiers: HashSet<String>,
    /// Modules to treat as absent.
    pub modules: HashSet<String>,
}

impl Exclusions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty() && self.modules.is_empty()
    }
}

/// The local binding introduced by a specifier (`a as b` binds `b`).
fn local_name(spec: &str) -> &str {
    spec.rsplit(" as ").next().unwrap_or(spec)
}

/// Drop excluded bindings and modules.
///
/// Bound imports whose specifier set becomes empty are dropped entirely;
/// side-effect imports survive specifier filtering unconditionally.
#[must_use]
pub fn apply_exclusions(records: Vec<ParsedImport>, exclusions: &Exclusions) -> Vec<ParsedImport> {
    if exclusions.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter_map(|mut rec| {
            if exclusions.modules.contains(&rec.module) {
                return None;
            }
            if rec.kind == ImportKind::SideEffect {
                return Some(rec);
            }
            let had_bindings = !rec.is_bare();
            if let Some(name) = &rec.default_name {
                if exclusions.specifiers.contains(local_name(name)) {
                    rec.default_name = None;
                }
            }
            rec.specifiers
                .retain(|s| !exclusions.specifiers.contains(local_name(s)));
            if had_bindings && rec.is_bare() {
                None
            } else {
                Some(rec)
            }
        })
        .collect()
}

/// Merge records within one group to one record per `(module, kind)` pair.
///
/// Specifier lists are unioned with set semantics; the first default-import
/// name contributed wins; the priority flag is sticky. Output preserves the
/// first-seen order of keys (the sorter imposes the final order).
#[must_use]
pub fn merge_records(records: Vec<ParsedImport>) -> Vec<ParsedImport> {
    let mut key_order: Vec<(String, ImportKind)> = Vec::new();
    let mut merged: HashMap<(String, ImportKind), ParsedImport> = HashMap::new();

    for rec in records {
        let key = (rec.module.clone(), rec.kind);
        if let Some(entry) = merged.get_mut(&key) {
            if entry.default_name.is_none() {
                entry.default_name = rec.default_name;
            }
            for spec in rec.specifiers {
                if !entry.specifiers.contains(&spec) {
                    entry.specifiers.push(spec);
                }
            }
            entry.is_priority |= rec.is_priority;
        } else {
            let mut rec = rec;
            let mut seen = HashSet::new();
            rec.specifiers.retain(|s| seen.insert(s.clone()));
            key_order.push(key.clone());
            merged.insert(key, rec);
        }
    }

    key_order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect()
}
