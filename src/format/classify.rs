//! Classifier - assigns import records to groups by pattern matching.
//!
//! Non-default groups are tested in ascending resolved order; the first match
//! wins. Lookups are memoized per module specifier, so a specifier that
//! recurs across records (or across documents under one configuration) is
//! only tested once. The cache carries no correctness obligation beyond being
//! dropped when the configuration changes; the owning `Formatter` guarantees
//! that by construction.

use std::collections::HashMap;

use regex::Regex;

use super::groups::ResolvedGroup;

/// Memoizing specifier-to-group classifier.
#[derive(Debug, Default)]
pub struct Classifier {
    cache: HashMap<String, usize>,
}

impl Classifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a module specifier into a group index.
    ///
    /// `groups` must be sorted ascending by resolved order; `default_index`
    /// points at the fallback group within it.
    pub fn classify(
        &mut self,
        module: &str,
        groups: &[ResolvedGroup],
        default_index: usize,
    ) -> usize {
        if let Some(&idx) = self.cache.get(module) {
            return idx;
        }
        let mut found = default_index;
        for (idx, group) in groups.iter().enumerate() {
            if group.is_default {
                continue;
            }
            if let Some(pattern) = &group.pattern {
                if pattern.is_match(module) {
                    found = idx;
                    break;
                }
            }
        }
        self.cache.insert(module.to_string(), found);
        found
    }

    /// Number of memoized specifiers.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop all memoized classifications.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

/// Test a module specifier against the priority-pattern list.
#[must_use]
pub fn is_priority(module: &str, priority_patterns: &[Regex]) -> bool {
    priority_patterns.iter().any(|re| re.is_match(module))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<ResolvedGroup> {
        vec![
            ResolvedGroup {
                name: "external".to_string(),
                order: 0,
                pattern: None,
                is_default: true,
            },
            ResolvedGroup {
                name: "aliased".to_string(),
                order: 1,
                pattern: Some(Regex::new("^@app/").unwrap()),
                is_default: false,
            },
            ResolvedGroup {
                name: "internal".to_string(),
                order: 2,
                pattern: Some(Regex::new(r"^\.").unwrap()),
                is_default: false,
            },
        ]
    }

    #[test]
    fn test_first_match_wins_in_order() {
        let groups = groups();
        let mut classifier = Classifier::new();
        assert_eq!(classifier.classify("@app/core", &groups, 0), 1);
        assert_eq!(classifier.classify("./local", &groups, 0), 2);
        assert_eq!(classifier.classify("../up", &groups, 0), 2);
    }

    #[test]
    fn test_no_match_falls_to_default() {
        let groups = groups();
        let mut classifier = Classifier::new();
        assert_eq!(classifier.classify("react", &groups, 0), 0);
    }

    #[test]
    fn test_cache_is_used_and_deterministic() {
        let groups = groups();
        let mut classifier = Classifier::new();
        let cold = classifier.classify("@app/core", &groups, 0);
        assert_eq!(classifier.cache_len(), 1);
        let warm = classifier.classify("@app/core", &groups, 0);
        assert_eq!(cold, warm);
        assert_eq!(classifier.cache_len(), 1);
    }

    #[test]
    fn test_clear_empties_cache() {
        let groups = groups();
        let mut classifier = Classifier::new();
        classifier.classify("react", &groups, 0);
        classifier.clear();
        assert_eq!(classifier.cache_len(), 0);
    }

    #[test]
    fn test_priority_patterns() {
        let patterns = vec![Regex::new("^react").unwrap()];
        assert!(is_priority("react-dom", &patterns));
        assert!(!is_priority("lodash", &patterns));
        assert!(!is_priority("x", &[]));
    }
}
