//! Integration tests for importfmt
//!
//! These tests verify that the pipeline components work together correctly:
//! locate -> parse -> classify -> merge -> sort -> render -> align -> splice.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use importfmt::format::resolve_orders;
use importfmt::process::{FormatOutcome, Formatter};
use importfmt::{Config, Exclusions, FormatError, GroupConfig, QuoteStyle};

fn group(name: &str, order: Option<f64>, pattern: Option<&str>, default: bool) -> GroupConfig {
    GroupConfig {
        name: name.to_string(),
        order,
        pattern: pattern.map(ToString::to_string),
        default,
        priority_patterns: Vec::new(),
    }
}

fn format_with(config: Config, source: &str) -> String {
    let mut formatter = Formatter::new(config).unwrap();
    match formatter.format_document(source).unwrap() {
        FormatOutcome::Changed(text) => text,
        FormatOutcome::Unchanged => source.to_string(),
    }
}

fn format(source: &str) -> String {
    format_with(Config::default(), source)
}

/// Column at which `from` starts, for lines that have a from clause
fn from_columns(block: &str) -> Vec<usize> {
    block
        .lines()
        .filter_map(|line| line.find(" from ").map(|p| p + 1))
        .collect()
}

#[test]
fn test_merge_same_module_scenario() {
    // Named and default imports of one module merge into one record per kind,
    // specifiers sorted, from keywords aligned
    let source = "import { b, a } from 'x';\nimport c from 'x';\n\ncode();\n";
    let expected = "\
// external
import c from 'x';
import {
    a,
    b
}        from 'x';

code();
";
    assert_eq!(format(source), expected);
}

#[test]
fn test_dynamic_import_aborts_unchanged() {
    let source = "import a from 'a';\nconst m = await import('./x');\nimport b from 'b';\n";
    let mut formatter = Formatter::new(Config::default()).unwrap();
    let err = formatter.format_document(source).unwrap_err();
    assert!(matches!(err, FormatError::LocatorAmbiguous(_)));
    // Fail-safe entry point returns the original text
    assert_eq!(formatter.format_lossy(source), source);
}

#[test]
fn test_order_collision_scenario() {
    // Two groups both declaring order 2: first-declared keeps 2, second gets 3
    assert_eq!(resolve_orders(&[Some(2.0), Some(2.0)]), vec![2, 3]);

    let config = Config {
        groups: vec![
            group("alpha", Some(2.0), Some("^alpha"), false),
            group("beta", Some(2.0), Some("^beta"), false),
            group("base", None, None, true),
        ],
        ..Default::default()
    };
    let source = "import b from 'beta-lib';\nimport a from 'alpha-lib';\n\ncode();\n";
    let output = format_with(config, source);
    let alpha_at = output.find("// alpha").unwrap();
    let beta_at = output.find("// beta").unwrap();
    assert!(alpha_at < beta_at);
}

#[test]
fn test_specifier_order_scenario() {
    // Ascending length, alphabetic tie-break: useState, useEffect, useCallback
    let source = "import { useEffect, useState, useCallback } from 'react';\n\ncode();\n";
    let output = format(source);
    let state_at = output.find("useState").unwrap();
    let effect_at = output.find("useEffect").unwrap();
    let callback_at = output.find("useCallback").unwrap();
    assert!(state_at < effect_at);
    assert!(effect_at < callback_at);
}

#[test]
fn test_idempotence() {
    let source = "\
// externals
import { useEffect, useState, useCallback } from 'react';
import ReactDOM from 'react-dom';
import 'core-js/stable';
import axios from 'axios';
import { api } from './api';
import util from '../util';

export function App() {}
";
    let once = format(source);
    let mut formatter = Formatter::new(Config::default()).unwrap();
    let second = formatter.format_document(&once).unwrap();
    assert!(
        !second.is_changed(),
        "second run must be a fixed point, got:\n{once}"
    );
}

#[test]
fn test_noop_safety() {
    // Already-canonical input: the splicer must report no change
    let source = "\
// external
import a from 'a';
import b from 'b';

code();
";
    let mut formatter = Formatter::new(Config::default()).unwrap();
    let outcome = formatter.format_document(source).unwrap();
    assert!(!outcome.is_changed());
}

#[test]
fn test_alignment_correctness() {
    let source = "\
import { longBindingName } from 'module-with-a-long-name';
import a from 'a';
import { x } from 'x';

code();
";
    let output = format(source);
    let columns = from_columns(&output);
    assert!(columns.len() >= 3);
    assert!(
        columns.windows(2).all(|w| w[0] == w[1]),
        "from columns differ: {columns:?}\n{output}"
    );
}

#[test]
fn test_remainder_untouched() {
    let body = "function main() {\n    return 42; // answer\n}\n\nmain();\n";
    let source = format!("import b from 'b';\nimport a from 'a';\n\n{body}");
    let output = format(&source);
    assert!(output.ends_with(body));
}

#[test]
fn test_document_without_header_block_untouched() {
    let source = "const x = 1;\nimport late from 'late';\n";
    let mut formatter = Formatter::new(Config::default()).unwrap();
    let outcome = formatter.format_document(source).unwrap();
    assert!(!outcome.is_changed());
}

#[test]
fn test_grouping_with_custom_patterns() {
    let config = Config {
        groups: vec![
            group("react", Some(0.0), Some("^react"), false),
            group("external", Some(1.0), None, true),
            group("aliased", Some(2.0), Some("^@app/"), false),
            group("internal", Some(3.0), Some(r"^\."), false),
        ],
        ..Default::default()
    };
    let source = "\
import { helper } from '@app/helpers';
import { local } from './local';
import axios from 'axios';
import React from 'react';

code();
";
    let output = format_with(config, source);
    let react_at = output.find("// react").unwrap();
    let external_at = output.find("// external").unwrap();
    let aliased_at = output.find("// aliased").unwrap();
    let internal_at = output.find("// internal").unwrap();
    assert!(react_at < external_at);
    assert!(external_at < aliased_at);
    assert!(aliased_at < internal_at);
    assert!(output.contains("import React from 'react';"));
}

#[test]
fn test_kind_weight_override_reorders() {
    let mut config = Config::default();
    config.kind_weights.insert("side_effect".to_string(), -1);
    let source = "import a from 'a';\nimport 'polyfill';\n\ncode();\n";
    let output = format_with(config, source);
    let polyfill_at = output.find("import 'polyfill';").unwrap();
    let default_at = output.find("import a").unwrap();
    assert!(polyfill_at < default_at);
}

#[test]
fn test_priority_imports_sort_first() {
    let mut config = Config::default();
    config.groups[0].priority_patterns = vec!["^zz-first".to_string()];
    let source = "import a from 'aaa';\nimport z from 'zz-first';\n\ncode();\n";
    let output = format_with(config, source);
    let priority_at = output.find("'zz-first'").unwrap();
    let normal_at = output.find("'aaa'").unwrap();
    assert!(priority_at < normal_at);
}

#[test]
fn test_type_imports_sort_after_value_imports() {
    let source = "\
import type { Props } from 'lib';
import { value } from 'lib';
import type Config from 'lib';

code();
";
    let output = format(source);
    let value_at = output.find("{ value }").unwrap();
    let type_default_at = output.find("type Config").unwrap();
    let type_named_at = output.find("type { Props }").unwrap();
    assert!(value_at < type_default_at);
    assert!(type_default_at < type_named_at);
}

#[test]
fn test_duplicate_imports_deduplicate() {
    let source = "\
import { a } from 'lib';
import { a, b } from 'lib';
import 'polyfill';
import 'polyfill';

code();
";
    let output = format(source);
    assert_eq!(output.matches("from 'lib'").count(), 1);
    assert_eq!(output.matches("import 'polyfill';").count(), 1);
    // Union without duplicates, rendered in the multi-line form
    assert!(output.contains("import {\n    a,\n    b\n}"));
}

#[test]
fn test_exclusions_reach_renderer_never() {
    let mut exclusions = Exclusions::default();
    exclusions.specifiers.insert("gone".to_string());
    exclusions.modules.insert("dead-module".to_string());
    let source = "\
import { gone, kept } from 'lib';
import dead from 'dead-module';
import 'lib';

code();
";
    let mut formatter = Formatter::new(Config::default()).unwrap();
    let FormatOutcome::Changed(output) = formatter.format_with(source, &exclusions).unwrap()
    else {
        panic!("expected change");
    };
    assert!(!output.contains("gone,"));
    assert!(!output.contains("dead-module"));
    assert!(output.contains("{ kept }"));
    // Side-effect import of a live module survives
    assert!(output.contains("import 'lib';"));
}

#[test]
fn test_quote_style_rendering() {
    let config = Config {
        quote: QuoteStyle::Double,
        ..Default::default()
    };
    let source = "import a from 'a';\n\ncode();\n";
    let output = format_with(config, source);
    assert!(output.contains("import a from \"a\";"));
}

#[test]
fn test_group_comments_can_be_disabled() {
    let config = Config {
        group_comments: false,
        ..Default::default()
    };
    let source = "import b from 'b';\nimport a from 'a';\n\ncode();\n";
    let output = format_with(config, source);
    assert!(!output.contains("//"));
    assert!(output.starts_with("import a from 'a';"));
}

#[test]
fn test_invalid_syntax_reports_position() {
    let source = "import a from 'a';\nimport ??? from 'b';\n\ncode();\n";
    let mut formatter = Formatter::new(Config::default()).unwrap();
    match formatter.format_document(source).unwrap_err() {
        FormatError::InvalidImportSyntax { line, snippet, .. } => {
            assert_eq!(line, 2);
            assert!(snippet.contains("import ???"));
            assert!(snippet.lines().last().unwrap().contains('^'));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_multiline_import_reflowed() {
    let source = "\
import {
    b,
    a } from 'mod';

code();
";
    let output = format(source);
    assert!(output.contains("import {\n    a,\n    b\n}"));
}

#[test]
fn test_namespace_import_roundtrip() {
    let source = "import * as path from 'path';\nimport fs from 'fs';\n\ncode();\n";
    let output = format(source);
    assert!(output.contains("import * as path"));
    // Both are default-kind records: module order puts fs first
    let fs_at = output.find("'fs'").unwrap();
    let path_at = output.find("'path'").unwrap();
    assert!(fs_at < path_at);
    let once_more = format(&output);
    assert_eq!(once_more, output);
}

#[test]
fn test_idempotence_under_custom_config() {
    let config = Config {
        indent: 2,
        quote: QuoteStyle::Double,
        groups: vec![
            group("react", Some(0.0), Some("^react"), false),
            group("vendor", None, None, true),
            group("local", Some(9.0), Some(r"^\."), false),
        ],
        ..Default::default()
    };
    let source = "\
import { z, y, x } from './utils';
import React, { useState, useMemo } from 'react';
import lodash from 'lodash';

run();
";
    let once = format_with(config.clone(), source);
    let twice = format_with(config, &once);
    assert_eq!(once, twice);
}

#[test]
fn test_order_totality_property() {
    let cases: Vec<Vec<Option<f64>>> = vec![
        vec![],
        vec![None],
        vec![Some(0.0), Some(0.0), Some(0.0)],
        vec![Some(7.0), None, Some(7.0), Some(-3.0), Some(2.5), None],
        vec![Some(1200.0), Some(3.0), None],
    ];
    for declared in cases {
        let orders = resolve_orders(&declared);
        assert_eq!(orders.len(), declared.len());
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), orders.len(), "orders collide: {orders:?}");
    }
}

#[test]
fn test_classification_determinism() {
    let mut formatter = Formatter::new(Config::default()).unwrap();
    let source = "import a from './x';\nimport b from './x';\nimport c from './x';\n\ncode();\n";
    let FormatOutcome::Changed(first) = formatter.format_document(source).unwrap() else {
        panic!("expected change");
    };
    // Same formatter, warm cache: same classification, fixed point reached
    let second = formatter.format_document(&first).unwrap();
    assert!(!second.is_changed());
    // Fresh formatter, cold cache: identical output
    let mut cold = Formatter::new(Config::default()).unwrap();
    let FormatOutcome::Changed(cold_out) = cold.format_document(source).unwrap() else {
        panic!("expected change");
    };
    assert_eq!(first, cold_out);
}
