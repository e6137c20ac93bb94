//! Intra-group Sorter - total ordering for merged records within one group.
//!
//! Comparator chain: declaration-kind weight, priority flag, module
//! specifier, then shortest-specifier comparison. The sort is stable, so the
//! order is deterministic across repeated runs on identical input.

use std::cmp::Ordering;

use crate::parser::ParsedImport;

/// Order a specifier list ascending by length, alphabetic on ties.
pub fn sort_specifiers(specifiers: &mut [String]) {
    specifiers.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
}

fn shortest_specifier_cmp(a: &ParsedImport, b: &ParsedImport) -> Ordering {
    // Specifier lists are already length-sorted, so the first entry is the
    // shortest one.
    match (a.specifiers.first(), b.specifiers.first()) {
        (Some(x), Some(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        _ => Ordering::Equal,
    }
}

/// Sort merged records within one group.
pub fn sort_group(records: &mut [ParsedImport], weights: &[i64; 5]) {
    for rec in records.iter_mut() {
        sort_specifiers(&mut rec.specifiers);
    }
    records.sort_by(|a, b| {
        weights[a.kind.index()]
            .cmp(&weights[b.kind.index()])
            .then_with(|| b.is_priority.cmp(&a.is_priority))
            .then_with(|| a.module.cmp(&b.module))
            .then_with(|| shortest_specifier_cmp(a, b))
    });
}
