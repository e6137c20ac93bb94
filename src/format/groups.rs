//! Group Order Resolver - turns user-declared group orders into a total,
//! collision-free ordering.
//!
//! Declared orders may be missing, negative, non-integral, or colliding; the
//! resolver always produces one strictly ascending unique order per group.

use std::collections::BTreeSet;

use regex::Regex;
use tracing::warn;

use crate::config::GroupConfig;
use crate::error::Result;

/// Requested orders above this emit a non-fatal diagnostic but are honored.
pub const MAX_SANE_ORDER: u32 = 1000;

/// A group with its final order and compiled matcher.
#[derive(Debug)]
pub struct ResolvedGroup {
    pub name: String,
    pub order: u32,
    pub pattern: Option<Regex>,
    pub is_default: bool,
}

/// Validate one declared order value.
///
/// Negative, non-integral, and non-finite values are all treated the same as
/// a missing declaration.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn valid_order(value: Option<f64>) -> Option<u32> {
    let v = value?;
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v > f64::from(u32::MAX) {
        return None;
    }
    Some(v as u32)
}

/// Resolve declared orders into a total, collision-free assignment.
///
/// Explicit orders are processed in declaration order; a claimed value is
/// incremented until free, which may push a later group's stated order upward.
/// Missing orders then fill the smallest unclaimed values, again in
/// declaration order. The output contains exactly one value per input, all
/// distinct.
#[must_use]
pub fn resolve_orders(declared: &[Option<f64>]) -> Vec<u32> {
    let mut result = vec![0u32; declared.len()];
    let mut explicit = vec![false; declared.len()];
    let mut claimed = BTreeSet::new();

    for (i, value) in declared.iter().enumerate() {
        let Some(wanted) = valid_order(*value) else {
            continue;
        };
        if wanted > MAX_SANE_ORDER {
            warn!(order = wanted, "group order exceeds sanity threshold");
        }
        let mut slot = wanted;
        while claimed.contains(&slot) {
            slot += 1;
        }
        claimed.insert(slot);
        result[i] = slot;
        explicit[i] = true;
    }

    let mut next = 0u32;
    for (i, is_explicit) in explicit.iter().enumerate() {
        if *is_explicit {
            continue;
        }
        while claimed.contains(&next) {
            next += 1;
        }
        claimed.insert(next);
        result[i] = next;
    }

    result
}

/// Resolve a configured group list: assign final orders, compile patterns,
/// and sort ascending by order.
pub fn resolve_groups(groups: &[GroupConfig]) -> Result<Vec<ResolvedGroup>> {
    let declared: Vec<Option<f64>> = groups.iter().map(|g| g.order).collect();
    let orders = resolve_orders(&declared);

    let mut resolved = Vec::with_capacity(groups.len());
    for (group, order) in groups.iter().zip(orders) {
        let pattern = match &group.pattern {
            Some(p) => Some(
                Regex::new(p)
                    .map_err(|e| anyhow::anyhow!("invalid pattern for group '{}': {e}", group.name))?,
            ),
            None => None,
        };
        resolved.push(ResolvedGroup {
            name: group.name.clone(),
            order,
            pattern,
            is_default: group.default,
        });
    }
    resolved.sort_by_key(|g| g.order);
    Ok(resolved)
}
