//! Property-based tests for configuration resolution and checking.

use proptest::prelude::*;
use std::collections::BTreeMap;

use pyflint::{AnalysisError, ConfigResolutionError, Error, OptionValue, RawConfig, engine};

// ============================================================================
// Strategies
// ============================================================================

/// Raw values that decode: JSON scalars, string lists and the absent marker.
fn arb_valid_raw() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|n| n.to_string()),
        any::<bool>().prop_map(|b| b.to_string()),
        Just("None".to_string()),
        "[a-zA-Z0-9_ ]{0,12}".prop_map(|s| format!("\"{s}\"")),
        prop::collection::vec("[A-Z][0-9]{0,3}", 0..4)
            .prop_map(|items| serde_json::to_string(&items).expect("string list serializes")),
    ]
}

/// Raw values that are neither JSON nor the absent marker.
fn arb_invalid_raw() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}-x").expect("valid regex")
}

fn arb_fields() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("f[a-z]{1,6}", arb_valid_raw(), 0..6)
}

/// Short Python programs assembled from a pool of lines; some do not parse.
fn arb_source() -> impl Strategy<Value = String> {
    let lines = prop_oneof![
        Just("import os"),
        Just("from . import sibling"),
        Just("x = 1"),
        Just("y = 'text'  "),
        Just("def f(a, b=[]):"),
        Just("    return a"),
        Just("    unused = 2"),
        Just("if x == None:"),
        Just("    pass"),
        Just("print(undefined)"),
        Just("class lower:"),
        Just("assert False"),
        Just("import sys  # noqa"),
        Just(""),
    ];
    prop::collection::vec(lines, 0..12).prop_map(|lines| {
        let mut source = lines.join("\n");
        source.push('\n');
        source
    })
}

fn init() {
    engine::initialize().expect("engine initializes");
}

// ============================================================================
// Resolution
// ============================================================================

proptest! {
    /// Resolution is total over decodable values: every field comes back.
    #[test]
    fn prop_resolve_keeps_every_field(fields in arb_fields()) {
        let mut raw = RawConfig::new();
        for (field, value) in &fields {
            raw.set("globals", field.as_str(), value.as_str());
        }
        let resolved = pyflint::resolve(&raw).expect("valid values resolve");
        prop_assert_eq!(resolved.entries().count(), fields.len());
        for (field, value) in &fields {
            let decoded = resolved.get("globals", field).expect("field present");
            prop_assert_eq!(decoded.is_absent(), value == "None");
        }
    }

    /// One undecodable value fails the whole resolution and is named.
    #[test]
    fn prop_resolve_is_atomic(fields in arb_fields(), bad in arb_invalid_raw()) {
        let mut raw = RawConfig::new();
        for (field, value) in &fields {
            raw.set("mccabe", field.as_str(), value.as_str());
        }
        raw.set("mccabe", "zz-broken", bad.as_str());

        let error = pyflint::resolve(&raw).unwrap_err();
        let is_invalid_json = matches!(error, ConfigResolutionError::InvalidJson { .. });
        prop_assert!(is_invalid_json);
        prop_assert_eq!(error.group(), "mccabe");
        prop_assert_eq!(error.field(), "zz-broken");
    }

    /// Integers survive decoding unchanged.
    #[test]
    fn prop_integer_values_decode(n in any::<i64>()) {
        let decoded =
            pyflint::config::decode_value("globals", "line-length", &n.to_string()).unwrap();
        prop_assert_eq!(decoded, OptionValue::Integer(n));
    }
}

// ============================================================================
// Checking
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Diagnostics are sorted, in range and identical across runs.
    #[test]
    fn prop_check_sorted_and_deterministic(source in arb_source()) {
        init();
        let mut raw = RawConfig::new();
        raw.set("globals", "select", "[\"ALL\"]");
        let config = engine::resolve(&raw).unwrap();

        match engine::check(&source, &config) {
            Ok(diagnostics) => {
                let line_count = source.lines().count();
                for pair in diagnostics.windows(2) {
                    let (a, b) = (pair[0].location(), pair[1].location());
                    prop_assert!((a.row, a.column) <= (b.row, b.column));
                }
                for diagnostic in &diagnostics {
                    prop_assert!(diagnostic.location().row >= 1);
                    prop_assert!(diagnostic.location().row <= line_count + 1);
                    prop_assert!(diagnostic.location().column >= 1);
                }
                prop_assert_eq!(engine::check(&source, &config).unwrap(), diagnostics);
            }
            Err(error) => {
                let is_analysis = matches!(
                    error,
                    Error::Analysis(
                        AnalysisError::Unsupported { .. } | AnalysisError::NestingTooDeep { .. }
                    )
                );
                prop_assert!(is_analysis);
            }
        }
    }

    /// Applying fixes never produces a file that stops parsing.
    #[test]
    fn prop_fixes_keep_source_parsing(source in arb_source()) {
        init();
        let mut raw = RawConfig::new();
        raw.set("globals", "select", "[\"ALL\"]");
        let config = engine::resolve(&raw).unwrap();

        let Ok(diagnostics) = engine::check(&source, &config) else {
            return Ok(());
        };
        if diagnostics.iter().any(|d| d.code() == "E999") {
            return Ok(());
        }
        let (fixed, _) = pyflint::apply_fixes(&source, &diagnostics);
        let after = engine::check(&fixed, &config).unwrap();
        prop_assert!(after.iter().all(|d| d.code() != "E999"), "fixed source: {:?}", fixed);
    }
}
